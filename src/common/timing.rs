// src/common/timing.rs

use core::time::Duration;

// Nominal values from the SDI-12 specification (tolerances are generally
// +/- 0.40 ms, Sec 7.0). Implementations using these should factor in
// tolerances where appropriate.

// === Break Timing (Sec 7.0, 7.1) ===

/// Minimum duration for a valid break signal (recorder must send >= 12 ms).
pub const BREAK_DURATION_MIN: Duration = Duration::from_millis(12);
/// Marking time required after a break before a sensor looks for an address.
pub const POST_BREAK_MARKING_MIN: Duration = Duration::from_micros(8330);
/// Marking time after which a break *must* precede the next command
/// (Sec 7.1: line marking > 87 ms implies the sensors may have gone to sleep).
pub const PRE_COMMAND_BREAK_MARKING_THRESHOLD: Duration = Duration::from_millis(87);

// === Command/Response Timing (Sec 7.0) ===

/// Settle window after the command's last stop bit before the reply is
/// drained. The line needs to turn around and slow sensors to start
/// clocking out their response.
pub const RESPONSE_SETTLE: Duration = Duration::from_millis(30);
/// Maximum time from end of command stop bit to start bit of the first
/// response byte (15 ms + 0.4 ms tolerance).
pub const RESPONSE_START_TIME_MAX: Duration = Duration::from_micros(15_400);

// === Byte Timing at 1200 Baud (7E1) ===
// 1 start bit + 7 data bits + 1 parity bit + 1 stop bit = 10 bits per byte.

/// Nominal duration of a single bit at 1200 baud.
pub const BIT_DURATION: Duration = Duration::from_nanos(833_333);
/// Nominal duration of a single byte (10 bits total) at 1200 baud.
/// The effective character rate the receive loop must pace itself to.
pub const BYTE_DURATION: Duration = Duration::from_micros(8333);
/// Longest gap tolerated between two characters of one response line
/// before the line is considered finished (two byte times).
pub const INTER_CHARACTER_TIMEOUT: Duration = Duration::from_micros(16_670);

// === Scan Probe Timing ===

/// Acknowledge attempts per address while scanning.
pub const PROBE_ATTEMPTS: usize = 3;
/// Fixed wait between unanswered probe attempts.
pub const PROBE_RETRY_WAIT: Duration = Duration::from_millis(20);
