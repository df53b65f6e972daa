//! Campbell Scientific CS215 temperature and relative humidity probe glue.
//!
//! Two values per measurement cycle: air temperature, then relative
//! humidity.

use super::{FieldSink, Sink};

/// Values carried by one CS215 data response.
pub const FIELD_COUNT: usize = 2;

pub const FIELD_TEMPERATURE: usize = 0;
pub const FIELD_HUMIDITY: usize = 1;

/// Optional per-field sinks for a CS215. An absent sink drops that field.
#[derive(Default)]
pub struct Cs215Sinks<'a> {
    pub temperature: Option<&'a mut dyn Sink>,
    pub humidity: Option<&'a mut dyn Sink>,
}

impl FieldSink for Cs215Sinks<'_> {
    fn publish(&mut self, index: usize, value: f32) {
        let sink = match index {
            FIELD_TEMPERATURE => &mut self.temperature,
            FIELD_HUMIDITY => &mut self.humidity,
            _ => return,
        };
        if let Some(sink) = sink {
            sink.publish(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_by_position() {
        let readings = std::cell::RefCell::new(Vec::new());
        {
            let mut temperature_sink = |v: f32| readings.borrow_mut().push(("t", v));
            let mut humidity_sink = |v: f32| readings.borrow_mut().push(("rh", v));
            let mut sinks = Cs215Sinks {
                temperature: Some(&mut temperature_sink),
                humidity: Some(&mut humidity_sink),
            };
            sinks.publish(FIELD_TEMPERATURE, 21.3);
            sinks.publish(FIELD_HUMIDITY, 48.0);
        }
        assert_eq!(readings.into_inner(), vec![("t", 21.3), ("rh", 48.0)]);
    }
}
