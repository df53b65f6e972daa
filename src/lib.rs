//! Driver for the SDI-12 half-duplex sensor bus.
//!
//! SDI-12 is a single-wire, 1200 baud party line of addressable
//! environmental sensors. This crate implements the datalogger side of the
//! protocol on top of two small HAL traits ([`common::Sdi12Serial`] and
//! [`common::Sdi12Timer`]):
//!
//! - [`bus::Sdi12Bus`] owns the line and serializes one command/response
//!   exchange at a time, honoring the bus timing windows (break, settle,
//!   character pacing).
//! - The bus also carries a non-blocking scanner that walks the full
//!   `0-9a-zA-Z` address space one address per [`bus::Sdi12Bus::tick`],
//!   so discovery never stalls the control loop.
//! - [`sensor::Sdi12Sensor`] runs the two-phase measurement protocol per
//!   device: `aM!` yields a delay and a field count, a deferred `aD0!`
//!   retrieves the values once that delay has elapsed.
//!
//! All state machines are advanced cooperatively from a single control
//! tick; there is no internal locking. Failures never escalate: they are
//! logged via the [`log`] facade and degrade to empty responses or
//! not-a-number sentinel values.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod common;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;

// Re-export key types for convenience
pub use bus::{Identification, ScanEntry, ScanResults, ScanStatus, Sdi12Bus};
pub use common::{Command, Response, Sdi12Addr, Sdi12Error};
pub use sensor::{FieldSink, Sdi12Device, Sdi12Sensor, Sink};
