//! The libswresample engine, enabled by the `native` feature.

mod ffi;

use std::ffi::CString;
use std::os::raw::c_int;
use std::ptr;

use libav_util::error::AVERROR_EINVAL;
use libav_util::Frame;

use crate::context::Context;
use crate::engine::Engine;
use crate::error::SwrError;
use crate::options::Options;

pub use ffi::SwrContext;

/// Returns the linked libswresample version as (major, minor, micro).
pub fn version() -> (u32, u32, u32) {
    let v = unsafe { ffi::swresample_version() };
    (v >> 16, (v >> 8) & 0xff, v & 0xff)
}

/// The system libswresample.
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

/// An owned `SwrContext` plus memory the context keeps pointing at.
pub struct NativeHandle {
    ptr: *mut ffi::SwrContext,
    // swr_set_channel_mapping stores the pointer, not a copy.
    channel_map: Option<Box<[c_int]>>,
}

// Safety: a SwrContext has no thread affinity and the handle is not Sync.
unsafe impl Send for NativeHandle {}

impl NativeHandle {
    pub fn as_ptr(&self) -> *mut ffi::SwrContext {
        self.ptr
    }
}

impl Engine for Native {
    type Handle = NativeHandle;
    type Frame = Frame;

    fn alloc(&self, options: &Options) -> Option<NativeHandle> {
        let (out, input) = (&options.output, &options.input);
        // The auxiliary value is configuration only; log_ctx must be an
        // AVClass-carrying struct, so it is never handed to the library.
        let ptr = unsafe {
            ffi::swr_alloc_set_opts(
                ptr::null_mut(),
                out.channel_layout.mask() as i64,
                out.sample_format.as_raw(),
                out.sample_rate,
                input.channel_layout.mask() as i64,
                input.sample_format.as_raw(),
                input.sample_rate,
                options.log_offset,
                ptr::null_mut(),
            )
        };
        if ptr.is_null() {
            return None;
        }
        Some(NativeHandle {
            ptr,
            channel_map: None,
        })
    }

    fn free(&self, mut handle: NativeHandle) {
        unsafe { ffi::swr_free(&mut handle.ptr) };
    }

    fn init(&self, h: &mut NativeHandle) -> i32 {
        unsafe { ffi::swr_init(h.ptr) }
    }

    fn is_initialized(&self, h: &NativeHandle) -> bool {
        unsafe { ffi::swr_is_initialized(h.ptr) != 0 }
    }

    fn close(&self, h: &mut NativeHandle) {
        unsafe { ffi::swr_close(h.ptr) };
    }

    fn convert(
        &self,
        h: &mut NativeHandle,
        out: &mut [&mut [u8]],
        out_count: i32,
        input: Option<&[&[u8]]>,
        in_count: i32,
    ) -> i32 {
        let mut out_ptrs: Vec<*mut u8> = out.iter_mut().map(|p| p.as_mut_ptr()).collect();
        let mut in_ptrs: Option<Vec<*const u8>> = input.map(|planes| planes.iter().map(|p| p.as_ptr()).collect());

        let out_arg = if out_ptrs.is_empty() {
            ptr::null_mut()
        } else {
            out_ptrs.as_mut_ptr()
        };
        let in_arg = in_ptrs
            .as_mut()
            .map_or(ptr::null_mut(), |v| v.as_mut_ptr());
        unsafe { ffi::swr_convert(h.ptr, out_arg, out_count, in_arg, in_count) }
    }

    fn convert_frame(&self, h: &mut NativeHandle, out: &mut Frame, input: Option<&Frame>) -> i32 {
        let in_ptr = input.map_or(ptr::null(), Frame::as_ptr);
        unsafe { ffi::swr_convert_frame(h.ptr, out.as_mut_ptr(), in_ptr) }
    }

    fn config_frame(&self, h: &mut NativeHandle, out: &Frame, input: &Frame) -> i32 {
        unsafe { ffi::swr_config_frame(h.ptr, out.as_ptr(), input.as_ptr()) }
    }

    fn next_pts(&self, h: &mut NativeHandle, pts: i64) -> i64 {
        unsafe { ffi::swr_next_pts(h.ptr, pts) }
    }

    fn set_compensation(&self, h: &mut NativeHandle, sample_delta: i32, distance: i32) -> i32 {
        unsafe { ffi::swr_set_compensation(h.ptr, sample_delta, distance) }
    }

    fn set_channel_mapping(&self, h: &mut NativeHandle, mapping: &[i32]) -> i32 {
        let map: Box<[c_int]> = mapping.iter().copied().collect();
        let ret = unsafe { ffi::swr_set_channel_mapping(h.ptr, map.as_ptr()) };
        if ret >= 0 {
            h.channel_map = Some(map);
        }
        ret
    }

    fn set_matrix(&self, h: &mut NativeHandle, matrix: &[f64], stride: i32) -> i32 {
        unsafe { ffi::swr_set_matrix(h.ptr, matrix.as_ptr(), stride) }
    }

    fn drop_output(&self, h: &mut NativeHandle, count: i32) -> i32 {
        unsafe { ffi::swr_drop_output(h.ptr, count) }
    }

    fn inject_silence(&self, h: &mut NativeHandle, count: i32) -> i32 {
        unsafe { ffi::swr_inject_silence(h.ptr, count) }
    }

    fn get_delay(&self, h: &NativeHandle, base: i64) -> i64 {
        unsafe { ffi::swr_get_delay(h.ptr, base) }
    }

    fn out_samples(&self, h: &NativeHandle, in_samples: i32) -> i32 {
        unsafe { ffi::swr_get_out_samples(h.ptr, in_samples) }
    }

    fn set_option(&self, h: &mut NativeHandle, name: &str, value: i64) -> i32 {
        let Ok(c_name) = CString::new(name) else {
            return AVERROR_EINVAL;
        };
        unsafe { ffi::av_opt_set_int(h.ptr.cast(), c_name.as_ptr(), value, 0) }
    }
}

impl Context<Native> {
    /// Allocates a libswresample context.
    pub fn new(options: Options) -> Result<Self, SwrError> {
        Self::with_engine(Native, options)
    }

    /// Adopts a context allocated elsewhere. The returned `Context` frees it.
    ///
    /// # Safety
    ///
    /// `ptr` must be a valid `SwrContext` not owned by anything else, and
    /// `options` must describe how it is configured.
    pub unsafe fn from_raw(ptr: *mut SwrContext, options: Options) -> Result<Self, SwrError> {
        if ptr.is_null() {
            return Err(SwrError::Allocation);
        }
        Ok(Self::from_parts(
            Native,
            NativeHandle {
                ptr,
                channel_map: None,
            },
            options,
        ))
    }

    /// Returns the underlying `SwrContext`, null once freed.
    pub fn as_ptr(&self) -> *mut SwrContext {
        self.handle().map_or(ptr::null_mut(), NativeHandle::as_ptr)
    }
}
