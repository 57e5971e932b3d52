//! Sample buffer sizing and an owned plane buffer.

use crate::channel_layout::ChannelLayout;
use crate::sample_format::SampleFormat;

/// Bytes one plane needs to hold `nb_samples` samples per channel.
///
/// Packed formats interleave every channel into a single plane; planar
/// formats keep one channel per plane. Saturates at `usize::MAX`.
pub fn plane_size(format: SampleFormat, channels: usize, nb_samples: usize) -> usize {
    checked_plane_size(format, channels, nb_samples).unwrap_or(usize::MAX)
}

/// Like [`plane_size`], returning `None` on overflow.
pub fn checked_plane_size(format: SampleFormat, channels: usize, nb_samples: usize) -> Option<usize> {
    let per_plane = if format.is_planar() { 1 } else { channels };
    nb_samples
        .checked_mul(per_plane)?
        .checked_mul(format.bytes_per_sample())
}

/// Total bytes for `nb_samples` samples with each plane padded to `align`,
/// the equivalent of av_samples_get_buffer_size(). `align == 0` means no
/// padding. Returns `None` when the request is empty or overflows.
pub fn buffer_size(
    channels: usize,
    nb_samples: usize,
    format: SampleFormat,
    align: usize,
) -> Option<usize> {
    if channels == 0 || nb_samples == 0 || format == SampleFormat::None {
        return None;
    }
    let per_plane = if format.is_planar() { 1 } else { channels };
    let mut line = nb_samples
        .checked_mul(per_plane)?
        .checked_mul(format.bytes_per_sample())?;
    if align > 1 {
        line = line.checked_add(align - 1)? / align * align;
    }
    line.checked_mul(format.planes(channels))
}

/// Caller-owned sample storage with one `Vec<u8>` per plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    layout: ChannelLayout,
    format: SampleFormat,
    capacity: usize,
    planes: Vec<Vec<u8>>,
}

impl SampleBuffer {
    /// Allocates silent planes for `capacity` samples per channel.
    pub fn new(layout: ChannelLayout, format: SampleFormat, capacity: usize) -> Self {
        let channels = layout.channels();
        let size = plane_size(format, channels, capacity);
        let planes = (0..format.planes(channels))
            .map(|_| vec![format.silence_byte(); size])
            .collect();
        Self {
            layout,
            format,
            capacity,
            planes,
        }
    }

    /// Wraps existing plane data. Every plane must be sized for the same
    /// whole number of samples.
    pub fn from_planes(
        layout: ChannelLayout,
        format: SampleFormat,
        planes: Vec<Vec<u8>>,
    ) -> Option<Self> {
        let channels = layout.channels();
        if planes.len() != format.planes(channels) {
            return None;
        }
        let unit = plane_size(format, channels, 1);
        if unit == 0 {
            return None;
        }
        let len = planes.first().map_or(0, Vec::len);
        if len % unit != 0 || planes.iter().any(|p| p.len() != len) {
            return None;
        }
        Some(Self {
            layout,
            format,
            capacity: len / unit,
            planes,
        })
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Samples per channel the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, index: usize) -> &[u8] {
        &self.planes[index]
    }

    pub fn plane_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.planes[index]
    }

    /// Borrows every plane, ready to pass as conversion input.
    pub fn planes(&self) -> Vec<&[u8]> {
        self.planes.iter().map(Vec::as_slice).collect()
    }

    /// Mutably borrows every plane, ready to pass as conversion output.
    pub fn planes_mut(&mut self) -> Vec<&mut [u8]> {
        self.planes.iter_mut().map(Vec::as_mut_slice).collect()
    }

    /// Overwrites every sample with silence.
    pub fn fill_silence(&mut self) {
        let byte = self.format.silence_byte();
        for plane in &mut self.planes {
            plane.fill(byte);
        }
    }

    pub fn into_planes(self) -> Vec<Vec<u8>> {
        self.planes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_size() {
        assert_eq!(plane_size(SampleFormat::S16, 2, 100), 400);
        assert_eq!(plane_size(SampleFormat::S16P, 2, 100), 200);
        assert_eq!(plane_size(SampleFormat::FltP, 6, 10), 40);
    }

    #[test]
    fn test_plane_size_overflow() {
        assert_eq!(checked_plane_size(SampleFormat::Dbl, 8, usize::MAX / 2), None);
        assert_eq!(checked_plane_size(SampleFormat::S16, 2, 3), Some(12));
        assert_eq!(plane_size(SampleFormat::S32, 2, usize::MAX / 4), usize::MAX);
    }

    #[test]
    fn test_buffer_size() {
        assert_eq!(buffer_size(2, 100, SampleFormat::S16, 0), Some(400));
        assert_eq!(buffer_size(2, 100, SampleFormat::S16P, 0), Some(400));
        // 3 samples of s16 mono = 6 bytes, padded to 32 per plane.
        assert_eq!(buffer_size(2, 3, SampleFormat::S16P, 32), Some(64));
        assert_eq!(buffer_size(0, 3, SampleFormat::S16, 0), None);
        assert_eq!(buffer_size(1, 3, SampleFormat::None, 0), None);
    }

    #[test]
    fn test_sample_buffer_planar() {
        let buf = SampleBuffer::new(ChannelLayout::STEREO, SampleFormat::FltP, 256);
        assert_eq!(buf.plane_count(), 2);
        assert_eq!(buf.plane(0).len(), 1024);
        assert_eq!(buf.capacity(), 256);
    }

    #[test]
    fn test_sample_buffer_u8_silence() {
        let mut buf = SampleBuffer::new(ChannelLayout::MONO, SampleFormat::U8, 4);
        assert_eq!(buf.plane(0), &[0x80; 4]);
        buf.plane_mut(0)[0] = 1;
        buf.fill_silence();
        assert_eq!(buf.plane(0), &[0x80; 4]);
    }

    #[test]
    fn test_from_planes() {
        let buf = SampleBuffer::from_planes(ChannelLayout::STEREO, SampleFormat::S16, vec![vec![0; 8]])
            .unwrap();
        assert_eq!(buf.capacity(), 2);

        // Odd byte count is not a whole number of stereo s16 samples.
        assert!(SampleBuffer::from_planes(ChannelLayout::STEREO, SampleFormat::S16, vec![vec![0; 6]]).is_none());
        // Planar stereo needs two planes.
        assert!(SampleBuffer::from_planes(ChannelLayout::STEREO, SampleFormat::S16P, vec![vec![0; 4]]).is_none());
    }
}
