//! FFmpeg status codes.
//!
//! FFmpeg reports failures as negative `int`s: either a negated POSIX errno
//! (`AVERROR(EINVAL)`) or a negated four-character tag (`AVERROR_EOF`).
//! [`AvError`] keeps the raw code and a decoded [`ErrorKind`].

use std::fmt;

use thiserror::Error;

/// Builds an FFmpeg error tag, the equivalent of `FFERRTAG(a, b, c, d)`.
pub const fn errtag(a: u8, b: u8, c: u8, d: u8) -> i32 {
    -((a as i32) | ((b as i32) << 8) | ((c as i32) << 16) | ((d as i32) << 24))
}

/// Builds a negated errno, the equivalent of `AVERROR(e)`.
pub const fn averror(errno: i32) -> i32 {
    -errno
}

// POSIX errno values used by libswresample (Linux/macOS agree on these).
pub const EPERM: i32 = 1;
pub const EIO: i32 = 5;
pub const EAGAIN_LINUX: i32 = 11;
pub const EAGAIN_DARWIN: i32 = 35;
pub const ENOMEM: i32 = 12;
pub const EINVAL: i32 = 22;
pub const ERANGE: i32 = 34;
pub const ENOSYS_LINUX: i32 = 38;
pub const ENOSYS_DARWIN: i32 = 78;

pub const AVERROR_EINVAL: i32 = averror(EINVAL);
pub const AVERROR_ENOMEM: i32 = averror(ENOMEM);

pub const AVERROR_BUFFER_TOO_SMALL: i32 = errtag(b'B', b'U', b'F', b'S');
pub const AVERROR_BUG: i32 = errtag(b'B', b'U', b'G', b'!');
pub const AVERROR_BUG2: i32 = errtag(b'B', b'U', b'G', b' ');
pub const AVERROR_EOF: i32 = errtag(b'E', b'O', b'F', b' ');
pub const AVERROR_EXIT: i32 = errtag(b'E', b'X', b'I', b'T');
pub const AVERROR_EXTERNAL: i32 = errtag(b'E', b'X', b'T', b' ');
pub const AVERROR_INVALIDDATA: i32 = errtag(b'I', b'N', b'D', b'A');
pub const AVERROR_OPTION_NOT_FOUND: i32 = errtag(0xF8, b'O', b'P', b'T');
pub const AVERROR_PATCHWELCOME: i32 = errtag(b'P', b'A', b'W', b'E');
pub const AVERROR_UNKNOWN: i32 = errtag(b'U', b'N', b'K', b'N');
pub const AVERROR_EXPERIMENTAL: i32 = -0x2bb2_afa8;
pub const AVERROR_INPUT_CHANGED: i32 = -0x636e_6701;
pub const AVERROR_OUTPUT_CHANGED: i32 = -0x636e_6702;

/// Decoded meaning of an FFmpeg status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfMemory,
    TryAgain,
    NotImplemented,
    PermissionDenied,
    OutOfRange,
    Io,
    Eof,
    Exit,
    InvalidData,
    BufferTooSmall,
    Bug,
    PatchWelcome,
    OptionNotFound,
    InputChanged,
    OutputChanged,
    External,
    Experimental,
    Unknown,
    /// A negative code this crate does not name.
    Other,
}

impl ErrorKind {
    /// Classifies a native status code.
    pub fn from_code(code: i32) -> Self {
        match code {
            c if c == averror(EINVAL) => Self::InvalidArgument,
            c if c == averror(ENOMEM) => Self::OutOfMemory,
            c if c == averror(EAGAIN_LINUX) || c == averror(EAGAIN_DARWIN) => Self::TryAgain,
            c if c == averror(ENOSYS_LINUX) || c == averror(ENOSYS_DARWIN) => Self::NotImplemented,
            c if c == averror(EPERM) => Self::PermissionDenied,
            c if c == averror(ERANGE) => Self::OutOfRange,
            c if c == averror(EIO) => Self::Io,
            AVERROR_EOF => Self::Eof,
            AVERROR_EXIT => Self::Exit,
            AVERROR_INVALIDDATA => Self::InvalidData,
            AVERROR_BUFFER_TOO_SMALL => Self::BufferTooSmall,
            AVERROR_BUG | AVERROR_BUG2 => Self::Bug,
            AVERROR_PATCHWELCOME => Self::PatchWelcome,
            AVERROR_OPTION_NOT_FOUND => Self::OptionNotFound,
            AVERROR_INPUT_CHANGED => Self::InputChanged,
            AVERROR_OUTPUT_CHANGED => Self::OutputChanged,
            AVERROR_EXTERNAL => Self::External,
            AVERROR_EXPERIMENTAL => Self::Experimental,
            AVERROR_UNKNOWN => Self::Unknown,
            _ => Self::Other,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::OutOfMemory => "cannot allocate memory",
            Self::TryAgain => "resource temporarily unavailable",
            Self::NotImplemented => "function not implemented",
            Self::PermissionDenied => "operation not permitted",
            Self::OutOfRange => "result out of range",
            Self::Io => "i/o error",
            Self::Eof => "end of file",
            Self::Exit => "immediate exit requested",
            Self::InvalidData => "invalid data found when processing input",
            Self::BufferTooSmall => "buffer too small",
            Self::Bug => "internal bug",
            Self::PatchWelcome => "not yet implemented in ffmpeg, patches welcome",
            Self::OptionNotFound => "option not found",
            Self::InputChanged => "input changed",
            Self::OutputChanged => "output changed",
            Self::External => "generic error in an external library",
            Self::Experimental => "experimental feature",
            Self::Unknown => "unknown error",
            Self::Other => "error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A failed native call: the original code plus its decoded kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{kind} (code {code})")]
pub struct AvError {
    code: i32,
    kind: ErrorKind,
}

impl AvError {
    /// Wraps a native status code.
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            kind: ErrorKind::from_code(code),
        }
    }

    /// Returns `Err` for negative status codes, `Ok(status)` otherwise.
    pub fn check(status: i32) -> Result<i32, AvError> {
        if status < 0 {
            Err(Self::from_code(status))
        } else {
            Ok(status)
        }
    }

    /// Returns the raw native code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the decoded kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns libavutil's own description of this code.
    #[cfg(feature = "native")]
    pub fn message(&self) -> String {
        crate::native::strerror(self.code)
    }
}
