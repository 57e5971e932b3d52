//! libavutil bindings, enabled by the `native` feature.

mod ffi;
mod frame;

use std::ffi::CStr;
use std::os::raw::c_char;

pub use ffi::AVFrame;
pub use frame::Frame;

/// Returns libavutil's description of an error code.
pub(crate) fn strerror(code: i32) -> String {
    let mut buf = [0 as c_char; 128];
    let ret = unsafe { ffi::av_strerror(code, buf.as_mut_ptr(), buf.len()) };
    if ret < 0 {
        return format!("error code {code}");
    }
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Returns the linked libavutil version as (major, minor, micro).
pub fn version() -> (u32, u32, u32) {
    let v = unsafe { ffi::avutil_version() };
    (v >> 16, (v >> 8) & 0xff, v & 0xff)
}
