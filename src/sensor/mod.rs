// src/sensor/mod.rs

// Shared logic for device-side drivers
pub mod parser;       // response body -> numeric fields
mod measurement;      // two-phase measurement scheduler

// Per-sensor glue modules
pub mod cs215;
pub mod ds2;

pub use measurement::{MeasurementTicket, Sdi12Sensor, MAX_FIELDS};

use crate::common::{address::Sdi12Addr, response::Response};

/// Per-device context: the bus address plus the helpers every
/// sensor-specific driver needs.
///
/// Drivers compose this record and borrow the shared [`crate::Sdi12Bus`]
/// per call; the handle itself never owns bus state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sdi12Device {
    address: Sdi12Addr,
}

impl Sdi12Device {
    pub fn new(address: Sdi12Addr) -> Self {
        Sdi12Device { address }
    }

    #[inline]
    pub fn address(&self) -> Sdi12Addr {
        self.address
    }

    /// True when `response` carries this device's address echo. Replies on
    /// a party line always start with the responder's address; anything
    /// else is cross-talk or garbage.
    pub fn owns_reply(&self, response: &Response) -> bool {
        response.starts_with(self.address)
    }

    /// Extracts numeric fields from a response body, one slot per expected
    /// field. See [`parser::parse_values`].
    pub fn parse_values(&self, body: &[u8], values: &mut [f32]) {
        parser::parse_values(body, values);
    }
}

/// Receives one published measurement value.
pub trait Sink {
    fn publish(&mut self, value: f32);
}

impl<F: FnMut(f32)> Sink for F {
    fn publish(&mut self, value: f32) {
        self(value)
    }
}

/// Routes parsed fields by their position in the data response.
///
/// [`Sdi12Sensor::tick`] calls this once per retrieved field; sensor glue
/// like [`ds2::Ds2Sinks`] fans the indices out to optional named sinks.
pub trait FieldSink {
    fn publish(&mut self, index: usize, value: f32);
}

impl<F: FnMut(usize, f32)> FieldSink for F {
    fn publish(&mut self, index: usize, value: f32) {
        self(index, value)
    }
}
