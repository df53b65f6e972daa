//! Decagon DS2 sonic anemometer glue.
//!
//! The DS2 reports three values per measurement cycle: wind speed, wind
//! direction and wind temperature. This module names the field positions
//! and fans them out to optional per-quantity sinks; unit semantics stay
//! with the host.

use super::{FieldSink, Sink};

/// Values carried by one DS2 data response.
pub const FIELD_COUNT: usize = 3;

pub const FIELD_WIND_SPEED: usize = 0;
pub const FIELD_WIND_DIRECTION: usize = 1;
pub const FIELD_WIND_TEMPERATURE: usize = 2;

/// Optional per-field sinks for a DS2. An absent sink drops that field.
///
/// ```no_run
/// # use sdi12_bus::sensor::ds2::Ds2Sinks;
/// # use sdi12_bus::Sink;
/// let mut wind_speed = |kmh: f32| { /* publish */ };
/// let mut sinks = Ds2Sinks {
///     wind_speed: Some(&mut wind_speed),
///     ..Ds2Sinks::default()
/// };
/// // sensor.tick(&mut bus, &mut sinks);
/// ```
#[derive(Default)]
pub struct Ds2Sinks<'a> {
    pub wind_speed: Option<&'a mut dyn Sink>,
    pub wind_direction: Option<&'a mut dyn Sink>,
    pub wind_temperature: Option<&'a mut dyn Sink>,
}

impl FieldSink for Ds2Sinks<'_> {
    fn publish(&mut self, index: usize, value: f32) {
        let sink = match index {
            FIELD_WIND_SPEED => &mut self.wind_speed,
            FIELD_WIND_DIRECTION => &mut self.wind_direction,
            FIELD_WIND_TEMPERATURE => &mut self.wind_temperature,
            _ => return,
        };
        if let Some(sink) = sink {
            sink.publish(value);
        }
    }
}
