//! The SDI-12 bus transport.
//!
//! [`Sdi12Bus`] owns the serial interface and is the single gateway to the
//! physical line: every exchange funnels through [`Sdi12Bus::send_command`],
//! which transmits one command, honors the settle window and drains the
//! reply at the bus character rate. Serialization is enforced by `&mut`
//! access from the single cooperative control tick, not by locks.

mod scanner;

pub use scanner::{Identification, ScanEntry, ScanResults, ScanStatus};

use core::fmt::Debug;
use core::time::Duration;

use log::{debug, error, warn};
use nb::Result as NbResult;

use crate::common::{
    command::Command,
    error::Sdi12Error,
    hal_traits::{Sdi12Serial, Sdi12Timer},
    response::{Response, MAX_RESPONSE_LEN},
    timing,
};

use scanner::ScanState;

/// Driver for one SDI-12 bus.
pub struct Sdi12Bus<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
    IF::Error: Debug,
{
    pub(crate) interface: IF,
    initialized: bool,
    scan_on_init: bool,
    last_activity: Option<IF::Instant>,
    scan: ScanState,
}

impl<IF> Sdi12Bus<IF>
where
    IF: Sdi12Serial + Sdi12Timer,
    IF::Error: Debug,
{
    /// Creates a bus driver over `interface`. The bus is unusable until
    /// [`initialize`](Self::initialize) has claimed it.
    pub fn new(interface: IF) -> Self {
        Sdi12Bus {
            interface,
            initialized: false,
            scan_on_init: false,
            last_activity: None,
            scan: ScanState::default(),
        }
    }

    /// Enables or disables the address-space scan kicked off by
    /// [`initialize`](Self::initialize).
    pub fn set_scan(&mut self, scan: bool) {
        self.scan_on_init = scan;
    }

    /// One-time setup: claims the line and, if configured, starts the
    /// discovery scan.
    pub fn initialize(&mut self) {
        debug!("setting up SDI-12 bus");
        self.initialized = true;
        if self.scan_on_init {
            self.start_scan();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current instant of the underlying timer.
    pub fn now(&self) -> IF::Instant {
        self.interface.now()
    }

    /// Consumes the driver and releases the serial interface.
    pub fn release(self) -> IF {
        self.interface
    }

    /// Executes one command/response exchange.
    ///
    /// Never fails at this surface: an uninitialized bus, a timeout or an
    /// I/O fault all come back as an empty [`Response`] with a logged
    /// diagnostic. Callers treat "empty" as "device absent or bus error".
    pub fn send_command(&mut self, command: Command) -> Response {
        match self.exchange(command) {
            Ok(response) => response,
            Err(Sdi12Error::NotReady) => {
                error!("SDI-12 bus not initialized");
                Response::empty()
            }
            Err(e) => {
                warn!("SDI-12 command '{}' failed: {:?}", command, e);
                Response::empty()
            }
        }
    }

    // --- Core Exchange Logic (Private) ---

    fn exchange(&mut self, command: Command) -> Result<Response, Sdi12Error<IF::Error>> {
        if !self.initialized {
            return Err(Sdi12Error::NotReady);
        }

        self.check_and_send_break()?;

        let command_buffer = command.format_into();
        self.send_command_bytes(command_buffer.as_bytes())?;

        // Settle window: give the addressed sensor time to turn the line
        // around before the reply is drained.
        self.interface
            .delay_ms(timing::RESPONSE_SETTLE.as_millis() as u32);

        let response = self.read_response()?;
        self.last_activity = Some(self.interface.now());
        Ok(response)
    }

    /// Sends a break unless the line was active recently enough that the
    /// sensors are still awake.
    fn check_and_send_break(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        let now = self.interface.now();
        let mut break_needed = true;

        if let Some(last_time) = self.last_activity {
            if now - last_time <= timing::PRE_COMMAND_BREAK_MARKING_THRESHOLD {
                break_needed = false;
            }
        }

        if break_needed {
            let break_timeout = timing::BREAK_DURATION_MIN + Duration::from_millis(5);
            self.blocking_io(break_timeout, |iface| iface.send_break())?;
            self.interface
                .delay_us(timing::POST_BREAK_MARKING_MIN.as_micros() as u32);
            self.last_activity = Some(self.interface.now());
        }

        Ok(())
    }

    /// Sends the already formatted command bytes over the serial interface.
    fn send_command_bytes(&mut self, cmd_bytes: &[u8]) -> Result<(), Sdi12Error<IF::Error>> {
        let write_duration = timing::BYTE_DURATION * cmd_bytes.len() as u32;
        let write_timeout = write_duration + Duration::from_millis(20);

        for byte in cmd_bytes {
            self.blocking_io(write_timeout, |iface| iface.write_byte(*byte))?;
        }

        let flush_timeout = Duration::from_millis(10);
        self.blocking_io(flush_timeout, |iface| iface.flush())?;

        Ok(())
    }

    /// Drains one response line, pacing reads at the bus character rate.
    ///
    /// A device that never starts replying yields an empty response; once
    /// bytes are flowing the line ends at `<CR><LF>` or after an
    /// inter-character gap of silence.
    fn read_response(&mut self) -> Result<Response, Sdi12Error<IF::Error>> {
        let mut response = Response::empty();

        let first = match self.blocking_io(timing::RESPONSE_START_TIME_MAX, |iface| {
            iface.read_byte()
        }) {
            Ok(byte) => byte,
            Err(Sdi12Error::Timeout) => return Ok(response),
            Err(e) => return Err(e),
        };
        if response.push(first).is_err() {
            return Err(Sdi12Error::BufferOverflow {
                needed: MAX_RESPONSE_LEN + 1,
                got: MAX_RESPONSE_LEN,
            });
        }

        loop {
            match self.blocking_io(timing::INTER_CHARACTER_TIMEOUT, |iface| iface.read_byte()) {
                Ok(byte) => {
                    if response.push(byte).is_err() {
                        return Err(Sdi12Error::BufferOverflow {
                            needed: response.len() + 1,
                            got: MAX_RESPONSE_LEN,
                        });
                    }
                    if response.as_bytes().ends_with(b"\r\n") {
                        break;
                    }
                }
                // Line went quiet; return what accumulated.
                Err(Sdi12Error::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(response)
    }

    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a
    /// timeout error.
    fn blocking_io<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, Sdi12Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(Sdi12Error::Timeout);
                    }
                    // Small delay to avoid spinning the poll loop flat out.
                    self.interface.delay_us(100);
                }
                Err(nb::Error::Other(e)) => return Err(Sdi12Error::Io(e)),
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::address::Sdi12Addr;
    use crate::mock::MockInterface;

    fn addr(c: char) -> Sdi12Addr {
        Sdi12Addr::new(c).unwrap()
    }

    fn ready_bus(mock: MockInterface) -> Sdi12Bus<MockInterface> {
        let mut bus = Sdi12Bus::new(mock);
        bus.initialize();
        bus
    }

    #[test]
    fn test_not_initialized_returns_empty_without_touching_hardware() {
        let mut bus = Sdi12Bus::new(MockInterface::new());
        let response = bus.send_command(Command::AcknowledgeActive { address: addr('0') });
        assert!(response.is_empty());
        assert!(bus.interface.commands.is_empty());
        assert_eq!(bus.interface.breaks, 0);
    }

    #[test]
    fn test_send_command_writes_bytes_and_returns_reply() {
        let mut mock = MockInterface::new();
        mock.stage_reply(b"0\r\n");
        let mut bus = ready_bus(mock);

        let response = bus.send_command(Command::AcknowledgeActive { address: addr('0') });
        assert_eq!(response.as_bytes(), b"0\r\n");
        assert_eq!(bus.interface.commands, vec!["0!".to_string()]);
        assert_eq!(bus.interface.breaks, 1);
    }

    #[test]
    fn test_silent_device_yields_empty_response() {
        let mut mock = MockInterface::new();
        mock.stage_silence();
        let mut bus = ready_bus(mock);

        let response = bus.send_command(Command::StartMeasurement { address: addr('4') });
        assert!(response.is_empty());
        assert_eq!(bus.interface.commands, vec!["4M!".to_string()]);
    }

    #[test]
    fn test_break_skipped_while_line_is_warm() {
        let mut mock = MockInterface::new();
        mock.stage_reply(b"1\r\n");
        mock.stage_reply(b"1\r\n");
        let mut bus = ready_bus(mock);

        bus.send_command(Command::AcknowledgeActive { address: addr('1') });
        // Second exchange follows immediately; the 87 ms marking threshold
        // has not elapsed, so no second break is sent.
        bus.send_command(Command::AcknowledgeActive { address: addr('1') });
        assert_eq!(bus.interface.breaks, 1);

        // After a long idle period the next command is preceded by a break.
        bus.interface.advance_ms(500);
        bus.interface.stage_reply(b"1\r\n");
        bus.send_command(Command::AcknowledgeActive { address: addr('1') });
        assert_eq!(bus.interface.breaks, 2);
    }

    #[test]
    fn test_reply_without_terminator_is_still_drained() {
        let mut mock = MockInterface::new();
        mock.stage_reply(b"2+1.0");
        let mut bus = ready_bus(mock);

        let response = bus.send_command(Command::SendData { address: addr('2') });
        assert_eq!(response.as_bytes(), b"2+1.0");
    }

    #[test]
    fn test_oversized_reply_is_dropped() {
        let mut mock = MockInterface::new();
        let long = [b'9'; MAX_RESPONSE_LEN + 8];
        mock.stage_reply(&long);
        let mut bus = ready_bus(mock);

        let response = bus.send_command(Command::SendData { address: addr('9') });
        assert!(response.is_empty());
    }
}
