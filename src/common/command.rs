//! SDI-12 command definitions.
//!
//! Only the commands this driver issues are represented: acknowledge,
//! identification, start measurement, data retrieval and the broadcast
//! address query.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::address::Sdi12Addr;

/// Longest command this driver ever formats (`aD0!`).
pub const MAX_COMMAND_LEN: usize = 4;

/// Represents an SDI-12 command.
///
/// The `Display` implementation generates the standard SDI-12 command
/// string (e.g. `0M!`, `3D0!`, `?!`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Acknowledge Active Command (`a!`) - causes the addressed sensor to
    /// send an acknowledgment.
    AcknowledgeActive { address: Sdi12Addr },

    /// Send Identification Command (`aI!`) - requests sensor
    /// identification information.
    SendIdentification { address: Sdi12Addr },

    /// Start Measurement Command (`aM!`) - initiates a measurement; the
    /// sensor replies with a timing estimate and a value count.
    StartMeasurement { address: Sdi12Addr },

    /// Send Data Command (`aD0!`) - requests data from a completed
    /// measurement.
    SendData { address: Sdi12Addr },

    /// Address Query Command (`?!`) - broadcast; the single device on the
    /// bus replies with its address.
    AddressQuery,
}

impl Command {
    /// Returns the address the command is directed to.
    /// The broadcast query reports the `'?'` wildcard.
    pub fn address(&self) -> Sdi12Addr {
        match self {
            Command::AcknowledgeActive { address } => *address,
            Command::SendIdentification { address } => *address,
            Command::StartMeasurement { address } => *address,
            Command::SendData { address } => *address,
            Command::AddressQuery => Sdi12Addr::QUERY_ADDRESS,
        }
    }

    /// The address a reply must echo, or `None` when any responder is
    /// acceptable (broadcast query).
    pub fn expected_reply_address(&self) -> Option<Sdi12Addr> {
        match self {
            Command::AddressQuery => None,
            _ => Some(self.address()),
        }
    }

    /// Formats the command into a stack buffer ready for transmission.
    pub fn format_into(&self) -> ArrayString<MAX_COMMAND_LEN> {
        let mut buf = ArrayString::new();
        // Cannot overflow: every variant fits MAX_COMMAND_LEN.
        let _ = write!(buf, "{}", self);
        buf
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AcknowledgeActive { address } => write!(f, "{}!", address),
            Command::SendIdentification { address } => write!(f, "{}I!", address),
            Command::StartMeasurement { address } => write!(f, "{}M!", address),
            Command::SendData { address } => write!(f, "{}D0!", address),
            Command::AddressQuery => f.write_str("?!"),
        }
    }
}
