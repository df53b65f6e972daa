// src/common/response.rs

use core::str;

use heapless::Vec;

use super::address::Sdi12Addr;

/// Largest response line the transport will accumulate. Standard ASCII
/// responses stay well below this; anything longer is a wiring fault.
pub const MAX_RESPONSE_LEN: usize = 96;

/// Raw bytes of one command/response exchange, handed to the caller by
/// value. An empty response means the addressed device stayed silent
/// (absent, asleep, or a bus error - the transport does not distinguish).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    bytes: Vec<u8, MAX_RESPONSE_LEN>,
}

impl Response {
    /// The empty response: no reply within the timing window.
    pub const fn empty() -> Self {
        Response { bytes: Vec::new() }
    }

    /// Builds a response from raw bytes; `None` if the slice exceeds
    /// [`MAX_RESPONSE_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Vec::from_slice(bytes).ok().map(|bytes| Response { bytes })
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), u8> {
        self.bytes.push(byte)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// First byte of the reply, the responding device's address echo.
    pub fn address(&self) -> Option<char> {
        self.bytes.first().map(|&b| b as char)
    }

    /// True when the reply starts with `address`.
    pub fn starts_with(&self, address: Sdi12Addr) -> bool {
        self.bytes.first() == Some(&(address.as_char() as u8))
    }

    /// The line with any trailing `\r`, `\n` or `\r\n` removed.
    pub fn trimmed(&self) -> &[u8] {
        let bytes: &[u8] = &self.bytes;
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }

    /// The line with the leading address echo and the trailing line
    /// terminator removed.
    pub fn body(&self) -> &[u8] {
        let trimmed = self.trimmed();
        trimmed.get(1..).unwrap_or(b"")
    }
}

/// Parsed reply to a start-measurement command: `atttn<CR><LF>` (or the
/// four-digit `attttn` form some sensors use for long preparation times).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeasurementTiming {
    /// The address of the responding sensor.
    pub address: Sdi12Addr,
    /// Seconds until the measurement data is ready. 0-9999.
    pub seconds: u16,
    /// Number of values the data command will return. 0-9.
    pub values_count: u8,
}

impl MeasurementTiming {
    /// Parses a start-measurement reply, checking the echoed address
    /// against `expected`. Any deviation from the fixed shape yields
    /// `None`; the caller logs and skips the cycle.
    pub fn parse(response: &Response, expected: Sdi12Addr) -> Option<Self> {
        let line = response.as_bytes().strip_suffix(b"\r\n")?;
        let (&addr_byte, digits) = line.split_first()?;
        if addr_byte != expected.as_char() as u8 {
            return None;
        }
        // 3 or 4 digits of seconds followed by a single-digit value count
        if !(4..=5).contains(&digits.len()) || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let (time_part, count_part) = digits.split_at(digits.len() - 1);
        let seconds: u16 = str::from_utf8(time_part).ok()?.parse().ok()?;
        let values_count = count_part[0] - b'0';
        Some(MeasurementTiming {
            address: expected,
            seconds,
            values_count,
        })
    }
}
