//! Audio frames.
//!
//! [`FrameAdapter`] is the read-only view resamplers need to (re)configure
//! themselves from a frame. [`MemoryFrame`] is a pure Rust frame backed by a
//! [`SampleBuffer`]; the `native` feature adds an owned `AVFrame`.

use crate::channel_layout::ChannelLayout;
use crate::sample_format::SampleFormat;
use crate::samples::SampleBuffer;

/// Stream parameters carried by an audio frame.
pub trait FrameAdapter {
    fn channel_layout(&self) -> ChannelLayout;
    fn sample_format(&self) -> SampleFormat;
    fn sample_rate(&self) -> i32;
    /// Valid samples per channel currently held by the frame.
    fn nb_samples(&self) -> usize;
}

/// An audio frame whose sample storage lives on the Rust heap.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFrame {
    layout: ChannelLayout,
    format: SampleFormat,
    sample_rate: i32,
    nb_samples: usize,
    buffer: Option<SampleBuffer>,
}

impl MemoryFrame {
    /// Creates a frame descriptor without sample storage.
    ///
    /// Used as an output frame, a resampler allocates the storage itself.
    pub fn new(layout: ChannelLayout, format: SampleFormat, sample_rate: i32) -> Self {
        Self {
            layout,
            format,
            sample_rate,
            nb_samples: 0,
            buffer: None,
        }
    }

    /// Creates a frame holding every sample of `buffer`.
    pub fn from_buffer(buffer: SampleBuffer, sample_rate: i32) -> Self {
        Self {
            layout: buffer.layout(),
            format: buffer.format(),
            sample_rate,
            nb_samples: buffer.capacity(),
            buffer: Some(buffer),
        }
    }

    /// Allocates silent storage for `capacity` samples per channel and
    /// resets the valid sample count to zero.
    pub fn alloc_buffer(&mut self, capacity: usize) {
        self.buffer = Some(SampleBuffer::new(self.layout, self.format, capacity));
        self.nb_samples = 0;
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer(&self) -> Option<&SampleBuffer> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut SampleBuffer> {
        self.buffer.as_mut()
    }

    /// Samples per channel the storage can hold, zero without storage.
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, SampleBuffer::capacity)
    }

    /// Sets the valid sample count, clamped to the capacity.
    pub fn set_nb_samples(&mut self, nb_samples: usize) {
        self.nb_samples = nb_samples.min(self.capacity());
    }

    /// Drops the sample storage, keeping the stream parameters.
    pub fn unref(&mut self) {
        self.buffer = None;
        self.nb_samples = 0;
    }
}

impl FrameAdapter for MemoryFrame {
    fn channel_layout(&self) -> ChannelLayout {
        self.layout
    }

    fn sample_format(&self) -> SampleFormat {
        self.format
    }

    fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    fn nb_samples(&self) -> usize {
        self.nb_samples
    }
}
