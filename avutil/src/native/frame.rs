//! Owned `AVFrame` wrapper.

use std::ptr;
use std::slice;

use super::ffi;
use crate::channel_layout::ChannelLayout;
use crate::error::{AvError, AVERROR_EINVAL, AVERROR_ENOMEM};
use crate::frame::FrameAdapter;
use crate::sample_format::SampleFormat;
use crate::samples::plane_size;

/// An audio frame allocated by libavutil.
///
/// The frame is released with `av_frame_free` when dropped.
pub struct Frame {
    ptr: *mut ffi::AVFrame,
}

// Safety: an AVFrame has no thread affinity; the wrapper is not Sync.
unsafe impl Send for Frame {}

impl Frame {
    /// Allocates an empty frame.
    pub fn new() -> Result<Self, AvError> {
        let ptr = unsafe { ffi::av_frame_alloc() };
        if ptr.is_null() {
            return Err(AvError::from_code(AVERROR_ENOMEM));
        }
        Ok(Self { ptr })
    }

    /// Allocates a frame descriptor with the given stream parameters and no
    /// sample storage.
    pub fn audio(
        layout: ChannelLayout,
        format: SampleFormat,
        sample_rate: i32,
    ) -> Result<Self, AvError> {
        let mut frame = Self::new()?;
        frame.set_params(layout, format, sample_rate, 0)?;
        Ok(frame)
    }

    /// Sets the stream parameters and the sample count.
    pub fn set_params(
        &mut self,
        layout: ChannelLayout,
        format: SampleFormat,
        sample_rate: i32,
        nb_samples: usize,
    ) -> Result<(), AvError> {
        let nb = i32::try_from(nb_samples).map_err(|_| AvError::from_code(AVERROR_EINVAL))?;
        let ret = unsafe {
            ffi::libav_frame_set_audio(self.ptr, layout.mask(), format.as_raw(), sample_rate, nb)
        };
        AvError::check(ret).map(|_| ())
    }

    /// Allocates sample storage for `nb_samples` samples per channel.
    pub fn alloc_buffer(&mut self, nb_samples: usize) -> Result<(), AvError> {
        self.set_params(
            self.channel_layout(),
            self.sample_format(),
            self.sample_rate(),
            nb_samples,
        )?;
        let ret = unsafe { ffi::av_frame_get_buffer(self.ptr, 0) };
        AvError::check(ret).map(|_| ())
    }

    /// Ensures the sample storage is not shared with another frame.
    pub fn make_writable(&mut self) -> Result<(), AvError> {
        let ret = unsafe { ffi::av_frame_make_writable(self.ptr) };
        AvError::check(ret).map(|_| ())
    }

    /// Releases the sample storage and resets every field.
    pub fn unref(&mut self) {
        unsafe { ffi::av_frame_unref(self.ptr) };
    }

    fn plane_len(&self) -> usize {
        plane_size(
            self.sample_format(),
            self.channel_layout().channels(),
            self.nb_samples(),
        )
    }

    /// Borrows the valid bytes of one plane.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        let channels = self.channel_layout().channels();
        if index >= self.sample_format().planes(channels) {
            return None;
        }
        let data = unsafe { ffi::libav_frame_plane(self.ptr, index as i32) };
        if data.is_null() {
            return None;
        }
        Some(unsafe { slice::from_raw_parts(data, self.plane_len()) })
    }

    /// Mutably borrows the valid bytes of one plane.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let channels = self.channel_layout().channels();
        if index >= self.sample_format().planes(channels) {
            return None;
        }
        let data = unsafe { ffi::libav_frame_plane(self.ptr, index as i32) };
        if data.is_null() {
            return None;
        }
        Some(unsafe { slice::from_raw_parts_mut(data, self.plane_len()) })
    }

    /// Allocated bytes per plane, including alignment padding.
    pub fn linesize(&self) -> usize {
        unsafe { ffi::libav_frame_linesize(self.ptr) }.max(0) as usize
    }

    pub fn as_ptr(&self) -> *const ffi::AVFrame {
        self.ptr
    }

    pub fn as_mut_ptr(&mut self) -> *mut ffi::AVFrame {
        self.ptr
    }
}

impl FrameAdapter for Frame {
    fn channel_layout(&self) -> ChannelLayout {
        ChannelLayout::from_mask(unsafe { ffi::libav_frame_channel_layout(self.ptr) })
    }

    fn sample_format(&self) -> SampleFormat {
        SampleFormat::from_raw(unsafe { ffi::libav_frame_format(self.ptr) })
    }

    fn sample_rate(&self) -> i32 {
        unsafe { ffi::libav_frame_sample_rate(self.ptr) }
    }

    fn nb_samples(&self) -> usize {
        unsafe { ffi::libav_frame_nb_samples(self.ptr) }.max(0) as usize
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { ffi::av_frame_free(&mut self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}
