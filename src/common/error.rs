// src/common/error.rs

/// Driver-internal error type. `E` is the HAL implementation's I/O error.
///
/// None of these cross the public driver surface as hard failures: the bus
/// and scheduler entry points log them and degrade to empty responses or
/// sentinel values.
#[derive(Debug, thiserror::Error)]
pub enum Sdi12Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Bus used before `initialize()` claimed it.
    #[error("bus not initialized")]
    NotReady,

    /// Operation timed out.
    #[error("operation timed out")]
    Timeout,

    /// Provided address character is not a valid SDI-12 address.
    #[error("invalid SDI-12 address character: '{0}'")]
    InvalidAddress(char),

    /// Response exceeded the receive buffer.
    #[error("buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },
}

// Allow mapping from the underlying HAL error with `?`.
impl<E: core::fmt::Debug> From<E> for Sdi12Error<E> {
    fn from(e: E) -> Self {
        Sdi12Error::Io(e)
    }
}
