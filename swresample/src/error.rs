use libav_util::{AvError, ErrorKind};
use thiserror::Error;

/// Errors returned by resampling context operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwrError {
    /// The engine could not allocate a context for the given options.
    #[error("swresample: allocation error")]
    Allocation,

    /// A native call returned a negative status.
    #[error("swresample: {0}")]
    Conversion(#[from] AvError),

    /// The context was already freed.
    #[error("swresample: context freed")]
    Freed,

    /// A sample buffer, mapping or matrix does not fit the stream.
    #[error("swresample: invalid buffer: {0}")]
    InvalidBuffer(String),

    /// An option name could not be passed to the engine.
    #[error("swresample: invalid option {0:?}")]
    InvalidOption(String),
}

impl SwrError {
    /// Returns the native status code for `Conversion` errors.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Conversion(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Returns the decoded kind for `Conversion` errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Conversion(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Maps a native status to `Ok(status)` or `SwrError::Conversion`.
pub(crate) fn check(status: i32) -> Result<i32, SwrError> {
    AvError::check(status).map_err(SwrError::from)
}
