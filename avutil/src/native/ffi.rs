//! Raw FFI bindings for libavutil plus the frame accessor shim.
//!
//! Hand-written against `libavutil/frame.h` and `libavutil/error.h`.
//! `AVFrame` stays opaque; its fields are reached through `csrc/frame_shim.c`.

use std::os::raw::{c_char, c_int, c_uint};

/// Opaque AVFrame.
pub enum AVFrame {}

unsafe extern "C" {
    pub fn avutil_version() -> c_uint;
    pub fn av_strerror(errnum: c_int, errbuf: *mut c_char, errbuf_size: usize) -> c_int;

    pub fn av_frame_alloc() -> *mut AVFrame;
    pub fn av_frame_free(frame: *mut *mut AVFrame);
    pub fn av_frame_unref(frame: *mut AVFrame);
    pub fn av_frame_get_buffer(frame: *mut AVFrame, align: c_int) -> c_int;
    pub fn av_frame_make_writable(frame: *mut AVFrame) -> c_int;

    // csrc/frame_shim.c
    pub fn libav_frame_set_audio(
        frame: *mut AVFrame,
        layout: u64,
        format: c_int,
        sample_rate: c_int,
        nb_samples: c_int,
    ) -> c_int;
    pub fn libav_frame_channel_layout(frame: *const AVFrame) -> u64;
    pub fn libav_frame_format(frame: *const AVFrame) -> c_int;
    pub fn libav_frame_sample_rate(frame: *const AVFrame) -> c_int;
    pub fn libav_frame_nb_samples(frame: *const AVFrame) -> c_int;
    pub fn libav_frame_plane(frame: *mut AVFrame, plane: c_int) -> *mut u8;
    pub fn libav_frame_linesize(frame: *const AVFrame) -> c_int;
}
