// src/common/address.rs

use super::error::Sdi12Error;
use core::convert::TryFrom;
use core::fmt;

/// Number of assignable addresses on an SDI-12 bus (`0-9`, `a-z`, `A-Z`).
pub const ADDRESS_SPACE_SIZE: usize = 62;

/// A single-character SDI-12 device address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Sdi12Addr(char);

impl Sdi12Addr {
    pub const DEFAULT_ADDRESS: Sdi12Addr = Sdi12Addr('0');
    pub const QUERY_ADDRESS: Sdi12Addr = Sdi12Addr('?');

    /// Creates a new `Sdi12Addr` if the given character is a valid address.
    /// `'?'` is accepted as the broadcast query address.
    pub fn new(address_char: char) -> Result<Self, Sdi12Error<()>> {
        if Self::is_valid_address_char(address_char) || address_char == '?' {
            Ok(Sdi12Addr(address_char))
        } else {
            Err(Sdi12Error::InvalidAddress(address_char))
        }
    }

    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }

    #[inline]
    pub const fn is_query(&self) -> bool {
        self.0 == '?'
    }

    #[inline]
    pub const fn is_standard(&self) -> bool {
        matches!(self.0, '0'..='9')
    }

    #[inline]
    pub const fn is_extended(&self) -> bool {
        matches!(self.0, 'a'..='z' | 'A'..='Z')
    }

    #[inline]
    pub const fn is_valid_address_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z')
    }

    /// Iterates over every assignable address in scan order: digits first,
    /// then lowercase, then uppercase.
    pub fn address_space() -> impl Iterator<Item = Sdi12Addr> {
        ('0'..='9').chain('a'..='z').chain('A'..='Z').map(Sdi12Addr)
    }
}

impl Default for Sdi12Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<char> for Sdi12Addr {
    type Error = Sdi12Error<()>;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sdi12Addr> for char {
    fn from(value: Sdi12Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Sdi12Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(Sdi12Addr::new('0').is_ok());
        assert!(Sdi12Addr::new('5').is_ok());
        assert!(Sdi12Addr::new('9').is_ok());
        assert!(Sdi12Addr::new('a').is_ok());
        assert!(Sdi12Addr::new('z').is_ok());
        assert!(Sdi12Addr::new('A').is_ok());
        assert!(Sdi12Addr::new('Z').is_ok());
        assert!(Sdi12Addr::new('?').is_ok());
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(matches!(Sdi12Addr::new(' '), Err(Sdi12Error::InvalidAddress(' '))));
        assert!(matches!(Sdi12Addr::new('$'), Err(Sdi12Error::InvalidAddress('$'))));
        assert!(matches!(Sdi12Addr::new('\n'), Err(Sdi12Error::InvalidAddress('\n'))));
        assert!(matches!(Sdi12Addr::new('é'), Err(Sdi12Error::InvalidAddress('é'))));
    }

    #[test]
    fn test_try_from_char() {
        assert_eq!(Sdi12Addr::try_from('1').unwrap(), Sdi12Addr('1'));
        assert_eq!(Sdi12Addr::try_from('b').unwrap(), Sdi12Addr('b'));
        assert_eq!(Sdi12Addr::try_from('C').unwrap(), Sdi12Addr('C'));
        assert!(matches!(Sdi12Addr::try_from('*'), Err(Sdi12Error::InvalidAddress('*'))));
    }

    #[test]
    fn test_address_space_order_and_size() {
        let all: Vec<char> = Sdi12Addr::address_space().map(|a| a.as_char()).collect();
        assert_eq!(all.len(), ADDRESS_SPACE_SIZE);
        assert_eq!(all[0], '0');
        assert_eq!(all[9], '9');
        assert_eq!(all[10], 'a');
        assert_eq!(all[35], 'z');
        assert_eq!(all[36], 'A');
        assert_eq!(all[61], 'Z');
        // no duplicates
        let mut dedup = all.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), ADDRESS_SPACE_SIZE);
    }

    #[test]
    fn test_address_kinds() {
        assert!(Sdi12Addr::new('3').unwrap().is_standard());
        assert!(!Sdi12Addr::new('3').unwrap().is_extended());
        assert!(Sdi12Addr::new('k').unwrap().is_extended());
        assert!(Sdi12Addr::new('K').unwrap().is_extended());
        assert!(Sdi12Addr::QUERY_ADDRESS.is_query());
        assert_eq!(Sdi12Addr::default(), Sdi12Addr::DEFAULT_ADDRESS);
    }
}
