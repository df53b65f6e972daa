//! Non-blocking discovery of the SDI-12 address space.
//!
//! Probing all 62 addresses with retries and settle delays in one go would
//! stall the control loop for seconds, so the scan advances exactly one
//! address per [`Sdi12Bus::tick`] and completes in `ADDRESS_SPACE_SIZE`
//! ticks. While a session is running the bus is reserved for discovery;
//! device schedulers check [`Sdi12Bus::is_scanning`] and defer.

use core::fmt::Debug;
use core::str;

use heapless::{Deque, String, Vec};
use log::{debug, info, warn};

use crate::common::{
    address::{Sdi12Addr, ADDRESS_SPACE_SIZE},
    command::Command,
    hal_traits::{Sdi12Serial, Sdi12Timer},
    timing,
};

use super::Sdi12Bus;

/// Identification text captured from an `aI!` reply, address echo and line
/// terminator stripped. The standard caps the payload well below this.
pub type Identification = String<48>;

/// Outcome of probing one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// All acknowledge attempts went unanswered.
    Inactive,
    /// The device acknowledged; identification text as returned (an empty
    /// string still counts as active).
    Active(Identification),
}

impl ScanStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ScanStatus::Active(_))
    }
}

/// One probed address and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub address: Sdi12Addr,
    pub status: ScanStatus,
}

/// Results of the current or most recent scan session, in probe order.
/// Cleared by the next `start_scan()`.
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    entries: Vec<ScanEntry, ADDRESS_SPACE_SIZE>,
}

impl ScanResults {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries.iter()
    }

    /// Outcome recorded for `address`, if that address has been probed.
    pub fn get(&self, address: Sdi12Addr) -> Option<&ScanStatus> {
        self.entries
            .iter()
            .find(|entry| entry.address == address)
            .map(|entry| &entry.status)
    }

    /// Iterates over the addresses that acknowledged.
    pub fn active(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries.iter().filter(|entry| entry.status.is_active())
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn record(&mut self, address: Sdi12Addr, status: ScanStatus) {
        // Capacity equals the address space; one entry per queued address.
        let _ = self.entries.push(ScanEntry { address, status });
    }
}

/// Internal scanner state machine: `Idle` <-> `Scanning`, driven by
/// `tick()`. `scanning == true` with a non-empty queue is the `Scanning`
/// state; an empty queue transitions back to `Idle`.
pub(super) struct ScanState {
    scanning: bool,
    queue: Deque<Sdi12Addr, ADDRESS_SPACE_SIZE>,
    results: ScanResults,
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState {
            scanning: false,
            queue: Deque::new(),
            results: ScanResults::default(),
        }
    }
}

impl<IF> Sdi12Bus<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
    IF::Error: Debug,
{
    /// Starts a scan session: queues all 62 addresses (digits, lowercase,
    /// uppercase) and clears the previous results.
    pub fn start_scan(&mut self) {
        if !self.is_initialized() {
            warn!("cannot scan: SDI-12 bus not initialized");
            return;
        }
        self.scan.queue = Deque::new();
        for address in Sdi12Addr::address_space() {
            // Queue capacity matches the address space; cannot overflow.
            let _ = self.scan.queue.push_back(address);
        }
        self.scan.results.clear();
        self.scan.scanning = true;
        info!("scanning SDI-12 address space ({} addresses)", ADDRESS_SPACE_SIZE);
    }

    /// True while a scan session is in progress. Device-level measurement
    /// traffic must be deferred until this returns false again.
    pub fn is_scanning(&self) -> bool {
        self.scan.scanning
    }

    /// Advances the scanner by exactly one address. No-op when idle.
    pub fn tick(&mut self) {
        if !self.scan.scanning {
            return;
        }
        let Some(address) = self.scan.queue.pop_front() else {
            self.scan.scanning = false;
            return;
        };

        let status = self.probe_address(address);
        match &status {
            ScanStatus::Active(info) if info.is_empty() => {
                info!("found SDI-12 device at address '{}'", address);
            }
            ScanStatus::Active(info) => {
                info!("found SDI-12 device at address '{}': {}", address, info);
            }
            ScanStatus::Inactive => {
                debug!("no SDI-12 device at address '{}'", address);
            }
        }
        self.scan.results.record(address, status);

        if self.scan.queue.is_empty() {
            self.scan.scanning = false;
            let active = self.scan.results.active().count();
            if active == 0 {
                info!("SDI-12 bus scan complete, found no devices");
            } else {
                info!("SDI-12 bus scan complete, found {} device(s)", active);
            }
        }
    }

    /// Results of the current or most recent scan session.
    pub fn scan_results(&self) -> &ScanResults {
        &self.scan.results
    }

    /// Probes one address with repeated acknowledge commands; an address
    /// that answers any attempt is identified on the spot.
    fn probe_address(&mut self, address: Sdi12Addr) -> ScanStatus {
        for _ in 0..timing::PROBE_ATTEMPTS {
            let reply = self.send_command(Command::AcknowledgeActive { address });
            if !reply.is_empty() {
                return ScanStatus::Active(self.identify(address));
            }
            self.interface
                .delay_ms(timing::PROBE_RETRY_WAIT.as_millis() as u32);
        }
        ScanStatus::Inactive
    }

    /// Fetches the identification text for a responding address. A silent
    /// or garbled reply degrades to an empty string.
    fn identify(&mut self, address: Sdi12Addr) -> Identification {
        let reply = self.send_command(Command::SendIdentification { address });
        let body = str::from_utf8(reply.body()).unwrap_or("");
        let mut text = Identification::new();
        for c in body.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        text
    }
}
