//! Our error types for the 9129B driver.

use thiserror::Error;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for 9129B communications.
///
/// A setpoint or channel selection the device refuses to confirm is not an error; those
/// operations report it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Communication timeout")]
    Timeout,
    #[error("Malformed reply received")]
    MalformedReply,
    #[error("Line does not fit in buffer")]
    BufferError,
    #[error("Invalid range")]
    InvalidRange,
}

impl<I: embedded_io::Error> From<crate::wire::ParseError> for Error<I> {
    fn from(_: crate::wire::ParseError) -> Self {
        Error::MalformedReply
    }
}
