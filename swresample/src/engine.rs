//! The seam between [`Context`](crate::Context) and a resampling engine.
//!
//! Each method mirrors one libswresample entry point and returns the raw
//! native status, so the context can translate every engine the same way.
//! Buffers arrive already validated against the tracked stream parameters.

use libav_util::FrameAdapter;

use crate::options::Options;

/// A resampling engine owning opaque per-context handles.
pub trait Engine {
    /// Per-context native state.
    type Handle;
    /// The frame type accepted by the frame-based calls.
    type Frame: FrameAdapter;

    /// Allocates and configures a context, `swr_alloc_set_opts`.
    fn alloc(&self, options: &Options) -> Option<Self::Handle>;
    /// Releases a context, `swr_free`.
    fn free(&self, handle: Self::Handle);

    fn init(&self, handle: &mut Self::Handle) -> i32;
    fn is_initialized(&self, handle: &Self::Handle) -> bool;
    fn close(&self, handle: &mut Self::Handle);

    /// `swr_convert`: returns samples per channel written or a negative
    /// status. `input == None` drains buffered samples.
    fn convert(
        &self,
        handle: &mut Self::Handle,
        out: &mut [&mut [u8]],
        out_count: i32,
        input: Option<&[&[u8]]>,
        in_count: i32,
    ) -> i32;

    fn convert_frame(
        &self,
        handle: &mut Self::Handle,
        out: &mut Self::Frame,
        input: Option<&Self::Frame>,
    ) -> i32;
    fn config_frame(&self, handle: &mut Self::Handle, out: &Self::Frame, input: &Self::Frame) -> i32;

    fn next_pts(&self, handle: &mut Self::Handle, pts: i64) -> i64;
    fn set_compensation(&self, handle: &mut Self::Handle, sample_delta: i32, distance: i32) -> i32;
    /// The engine may keep reading `mapping` until the handle is freed, so
    /// implementations must keep their own copy alive.
    fn set_channel_mapping(&self, handle: &mut Self::Handle, mapping: &[i32]) -> i32;
    fn set_matrix(&self, handle: &mut Self::Handle, matrix: &[f64], stride: i32) -> i32;
    fn drop_output(&self, handle: &mut Self::Handle, count: i32) -> i32;
    fn inject_silence(&self, handle: &mut Self::Handle, count: i32) -> i32;
    fn get_delay(&self, handle: &Self::Handle, base: i64) -> i64;
    fn out_samples(&self, handle: &Self::Handle, in_samples: i32) -> i32;
    /// Sets a named integer AVOption on the context.
    fn set_option(&self, handle: &mut Self::Handle, name: &str, value: i64) -> i32;
}
