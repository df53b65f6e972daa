// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A monotonic point in time produced by [`Sdi12Timer::now`].
///
/// Anything that can be compared, advanced by a `Duration` and subtracted
/// into a `Duration` qualifies; a blanket impl covers conforming types.
pub trait Sdi12Instant:
    Copy + Debug + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Sdi12Instant for T where
    T: Copy + Debug + PartialOrd + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for timer/delay operations required by SDI-12.
pub trait Sdi12Timer {
    /// Monotonic instant type for deadline and due-time bookkeeping.
    type Instant: Sdi12Instant;

    /// Current instant.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for synchronous (non-blocking) SDI-12 serial communication.
///
/// Pin direction, UART configuration and the electrical details of the
/// 1200 baud 7E1 line live behind this trait.
pub trait Sdi12Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as
    /// `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or
    /// `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes
    /// have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Sends the SDI-12 break condition (>= 12 ms of spacing).
    ///
    /// Implementations must ensure the line is held low for the required
    /// duration.
    fn send_break(&mut self) -> nb::Result<(), Self::Error>;
}
