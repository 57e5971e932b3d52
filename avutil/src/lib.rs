//! Shared libavutil vocabulary for the libav bindings.
//!
//! - `error`: native status codes decoded into [`AvError`]
//! - `channel_layout` / `sample_format`: stream parameter types with the
//!   native numbering and FFmpeg's names
//! - `samples`: plane sizing and the owned [`SampleBuffer`]
//! - `frame`: the [`FrameAdapter`] view and the in-memory [`MemoryFrame`]
//!
//! With the `native` feature the crate links libavutil and adds
//! [`Frame`], an owned `AVFrame`.
//!
//! # Example
//!
//! ```rust
//! use libav_util::{ChannelLayout, SampleBuffer, SampleFormat};
//!
//! let buf = SampleBuffer::new(ChannelLayout::STEREO, SampleFormat::S16P, 1024);
//! assert_eq!(buf.plane_count(), 2);
//! assert_eq!(buf.plane(0).len(), 2048);
//! ```

pub mod channel_layout;
pub mod error;
pub mod frame;
pub mod sample_format;
pub mod samples;

#[cfg(feature = "native")]
mod native;

pub use channel_layout::ChannelLayout;
pub use error::{AvError, ErrorKind};
pub use frame::{FrameAdapter, MemoryFrame};
pub use sample_format::SampleFormat;
pub use samples::SampleBuffer;

#[cfg(feature = "native")]
pub use native::{version, AVFrame, Frame};
