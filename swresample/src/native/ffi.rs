//! Raw FFI bindings for libswresample.
//!
//! These declarations match `libswresample/swresample.h` (FFmpeg 4.x to 6.x,
//! the releases that still ship `swr_alloc_set_opts`).

use std::os::raw::{c_char, c_double, c_int, c_uint, c_void};

use libav_util::AVFrame;

/// Opaque SwrContext.
pub enum SwrContext {}

unsafe extern "C" {
    pub fn swresample_version() -> c_uint;

    // Context
    pub fn swr_alloc_set_opts(
        s: *mut SwrContext,
        out_ch_layout: i64,
        out_sample_fmt: c_int,
        out_sample_rate: c_int,
        in_ch_layout: i64,
        in_sample_fmt: c_int,
        in_sample_rate: c_int,
        log_offset: c_int,
        log_ctx: *mut c_void,
    ) -> *mut SwrContext;
    pub fn swr_init(s: *mut SwrContext) -> c_int;
    pub fn swr_is_initialized(s: *mut SwrContext) -> c_int;
    pub fn swr_free(s: *mut *mut SwrContext);
    pub fn swr_close(s: *mut SwrContext);

    // Conversion
    pub fn swr_convert(
        s: *mut SwrContext,
        out: *mut *mut u8,
        out_count: c_int,
        input: *mut *const u8,
        in_count: c_int,
    ) -> c_int;
    pub fn swr_next_pts(s: *mut SwrContext, pts: i64) -> i64;

    // Low-level options
    pub fn swr_set_compensation(
        s: *mut SwrContext,
        sample_delta: c_int,
        compensation_distance: c_int,
    ) -> c_int;
    pub fn swr_set_channel_mapping(s: *mut SwrContext, channel_map: *const c_int) -> c_int;
    pub fn swr_set_matrix(s: *mut SwrContext, matrix: *const c_double, stride: c_int) -> c_int;

    // Sample handling
    pub fn swr_drop_output(s: *mut SwrContext, count: c_int) -> c_int;
    pub fn swr_inject_silence(s: *mut SwrContext, count: c_int) -> c_int;
    pub fn swr_get_delay(s: *mut SwrContext, base: i64) -> i64;
    pub fn swr_get_out_samples(s: *mut SwrContext, in_samples: c_int) -> c_int;

    // Frame API
    pub fn swr_convert_frame(s: *mut SwrContext, output: *mut AVFrame, input: *const AVFrame) -> c_int;
    pub fn swr_config_frame(s: *mut SwrContext, out: *const AVFrame, input: *const AVFrame) -> c_int;

    // libavutil/opt.h
    pub fn av_opt_set_int(obj: *mut c_void, name: *const c_char, val: i64, search_flags: c_int) -> c_int;
}
