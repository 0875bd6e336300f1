use log::Level;
use serde::Serialize;
use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{Display, Error as FmtError, Formatter},
};

/// Trait implemented by all error types in this crate.
///
/// Errors carry a stable machine-readable code alongside their human-readable
/// `Display` rendering, and state how severe they are when logged.
pub trait DetailedError: StdError + Serialize {
    fn error_code(&self) -> Cow<'static, str>;
    fn log_level(&self) -> Level {
        Level::Error
    }
}

/// Result of a buffer read or extract: the requested bytes, or an error.
pub type ExpectedData<E> = Result<Vec<u8>, E>;

/// The single recoverable failure produced by the buffer core.
///
/// Returned when a read or extract cannot be satisfied: the buffer is in the
/// error state, or a positive byte count was requested that the buffer cannot
/// deliver and will never be able to deliver (empty, or closed with fewer
/// bytes remaining).  Callers distinguish the cases through the buffer's
/// observers ([`is_readable`](crate::Fifo::is_readable),
/// [`eof`](crate::Fifo::eof)), not through the error itself.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InsufficientData {
    reason: Cow<'static, str>,
}

impl InsufficientData {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The human-readable reason this operation could not be satisfied.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub(crate) fn short_read() -> Self {
        Self::new("insufficient data to read")
    }

    pub(crate) fn short_extract() -> Self {
        Self::new("insufficient data to extract")
    }

    pub(crate) fn errored() -> Self {
        Self::new("buffer is in the error state")
    }
}

impl DetailedError for InsufficientData {
    fn error_code(&self) -> Cow<'static, str> {
        Cow::from("InsufficientData")
    }

    // Recoverable by contract: callers are expected to retry, drain, or stop.
    fn log_level(&self) -> Level {
        Level::Debug
    }
}

impl Display for InsufficientData {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(&self.reason)
    }
}

impl StdError for InsufficientData {}
