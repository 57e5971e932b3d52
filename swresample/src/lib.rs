//! Safe bindings for FFmpeg's libswresample.
//!
//! A [`Context`] owns one resampling handle and exposes the libswresample
//! context API: initialization, sample and frame conversion, and the
//! low-level knobs (compensation, channel mapping, remix matrix, output
//! dropping, silence injection, delay and pts queries). Native status codes
//! come back as [`SwrError::Conversion`] carrying the original code.
//!
//! The context is generic over an [`Engine`]. The `native` feature provides
//! `Native`, which links the system libswresample. The `fake` feature
//! provides `FakeEngine`, a pure Rust engine with the same call contract
//! for tests.
//!
//! # Example
//!
//! ```rust
//! use libav_swresample::{Context, FakeEngine, Options, StreamSpec};
//! use libav_util::{ChannelLayout, SampleFormat};
//!
//! let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::S16, 16000);
//! let mut ctx = Context::with_engine(FakeEngine::new(), Options::passthrough(spec)).unwrap();
//! ctx.init().unwrap();
//!
//! let input = [1u8, 0, 2, 0, 3, 0];
//! let mut out = [0u8; 6];
//! let n = ctx.convert(&mut [&mut out[..]], 3, Some(&[&input[..]][..]), 3).unwrap();
//! assert_eq!(n, 3);
//! assert_eq!(out, input);
//! ```
//!
//! # Resource Management
//!
//! Handles are released by [`Context::free`] or when the context is
//! dropped, whichever comes first. Calls on a freed context return
//! [`SwrError::Freed`].

mod context;
mod engine;
mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
mod options;

#[cfg(feature = "native")]
mod native;

pub use context::Context;
pub use engine::Engine;
pub use error::SwrError;
#[cfg(any(test, feature = "fake"))]
pub use fake::{FakeEngine, FakeHandle, Op};
pub use options::{Options, StreamSpec};

#[cfg(feature = "native")]
pub use native::{version, Native, NativeHandle, SwrContext};
