//! Two-phase measurement scheduling.
//!
//! SDI-12 measurements are asynchronous on the sensor side: `aM!` starts
//! the measurement and the sensor answers with how many seconds it needs
//! and how many values it will produce. The driver must come back with
//! `aD0!` once that delay has elapsed - without stalling the rest of the
//! system in between. [`Sdi12Sensor`] records the due-time as a
//! [`MeasurementTicket`] and a periodic tick consumes it.

use core::fmt::Debug;
use core::time::Duration;

use log::{debug, warn};

use crate::bus::Sdi12Bus;
use crate::common::{
    address::Sdi12Addr,
    command::Command,
    hal_traits::{Sdi12Instant, Sdi12Serial, Sdi12Timer},
    response::MeasurementTiming,
};

use super::{parser, FieldSink, Sdi12Device};

/// Maximum number of values one `aD0!` response can carry (the timing
/// reply encodes the count as a single digit).
pub const MAX_FIELDS: usize = 9;

/// A scheduled deferred data retrieval: created when a measurement request
/// succeeds, consumed when the due-time is reached, then discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeasurementTicket<I> {
    due_at: I,
    values_count: u8,
}

impl<I: Sdi12Instant> MeasurementTicket<I> {
    pub fn due_at(&self) -> I {
        self.due_at
    }

    pub fn values_count(&self) -> u8 {
        self.values_count
    }
}

/// Per-device measurement scheduler.
///
/// An external poll interval drives [`poll`](Self::poll) (Phase 1); the
/// control loop drives [`tick`](Self::tick) (Phase 2). At most one ticket
/// is outstanding per device - a new request overwrites an unconsumed one,
/// so only the latest due-time is ever honored.
#[derive(Debug)]
pub struct Sdi12Sensor<I> {
    device: Sdi12Device,
    pending: Option<MeasurementTicket<I>>,
}

impl<I: Sdi12Instant> Sdi12Sensor<I> {
    pub fn new(address: Sdi12Addr) -> Self {
        Sdi12Sensor {
            device: Sdi12Device::new(address),
            pending: None,
        }
    }

    pub fn device(&self) -> &Sdi12Device {
        &self.device
    }

    /// True while a retrieval is scheduled but not yet performed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Phase 1: requests a measurement and schedules the retrieval.
    ///
    /// Sends `aM!` and parses the `atttn` timing reply. On a malformed or
    /// missing reply the cycle is skipped - no ticket is created and the
    /// next poll interval retries from scratch. Deferred without bus
    /// traffic while a scan session holds the bus.
    pub fn poll<IF>(&mut self, bus: &mut Sdi12Bus<IF>)
    where
        IF: Sdi12Serial + Sdi12Timer<Instant = I>,
        IF::Error: Debug,
    {
        let address = self.device.address();

        if bus.is_scanning() {
            debug!("'{}': bus scan in progress, deferring measurement", address);
            return;
        }

        let reply = bus.send_command(Command::StartMeasurement { address });
        let Some(timing) = MeasurementTiming::parse(&reply, address) else {
            warn!(
                "'{}': malformed measurement reply {:?}, skipping cycle",
                address,
                reply.as_bytes()
            );
            return;
        };

        let wait = Duration::from_millis(u64::from(timing.seconds) * 1000);
        let ticket = MeasurementTicket {
            due_at: bus.now() + wait,
            values_count: timing.values_count,
        };
        debug!(
            "'{}': {} value(s) ready in {} s",
            address, timing.values_count, timing.seconds
        );
        // Last request wins: an unconsumed ticket is simply replaced.
        self.pending = Some(ticket);
    }

    /// Phase 2: retrieves and publishes data for a due ticket.
    ///
    /// Once the due-time is reached, sends `aD0!`, verifies the address
    /// echo, parses the body with the field count recorded in the ticket
    /// and publishes each field by index. The ticket is discarded
    /// unconditionally after the attempt; unreadable fields publish the
    /// NAN sentinel. While a scan session holds the bus the ticket is kept
    /// and the attempt retried on a later tick.
    pub fn tick<IF, S>(&mut self, bus: &mut Sdi12Bus<IF>, sink: &mut S)
    where
        IF: Sdi12Serial + Sdi12Timer<Instant = I>,
        IF::Error: Debug,
        S: FieldSink,
    {
        if bus.is_scanning() {
            return;
        }
        let Some(ticket) = self.pending else {
            return;
        };
        if bus.now() < ticket.due_at {
            return;
        }
        self.pending = None;

        let address = self.device.address();
        let reply = bus.send_command(Command::SendData { address });
        if !self.device.owns_reply(&reply) {
            warn!(
                "'{}': bad data reply {:?}, dropping this measurement",
                address,
                reply.as_bytes()
            );
            return;
        }

        let count = usize::from(ticket.values_count).min(MAX_FIELDS);
        let mut values = [f32::NAN; MAX_FIELDS];
        let fields = &mut values[..count];
        // hand over the body with only the address echo stripped; the
        // parser owns line-terminator handling
        parser::parse_values(&reply.as_bytes()[1..], fields);

        for (index, value) in fields.iter().enumerate() {
            sink.publish(index, *value);
        }
    }
}
