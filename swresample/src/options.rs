//! Resampling context configuration.

use libav_util::samples::{checked_plane_size, plane_size};
use libav_util::{ChannelLayout, FrameAdapter, SampleFormat};
use serde::{Deserialize, Serialize};

/// Parameters of one side (input or output) of a resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSpec {
    pub channel_layout: ChannelLayout,
    pub sample_format: SampleFormat,
    /// Sample rate in Hz.
    pub sample_rate: i32,
}

impl StreamSpec {
    pub const fn new(channel_layout: ChannelLayout, sample_format: SampleFormat, sample_rate: i32) -> Self {
        Self {
            channel_layout,
            sample_format,
            sample_rate,
        }
    }

    /// Reads the parameters carried by a frame.
    pub fn of_frame<F: FrameAdapter + ?Sized>(frame: &F) -> Self {
        Self::new(frame.channel_layout(), frame.sample_format(), frame.sample_rate())
    }

    pub fn channels(&self) -> usize {
        self.channel_layout.channels()
    }

    /// Number of data planes a buffer for this stream has.
    pub fn planes(&self) -> usize {
        self.sample_format.planes(self.channels())
    }

    /// Bytes each plane needs for `nb_samples` samples per channel.
    pub fn plane_size(&self, nb_samples: usize) -> usize {
        plane_size(self.sample_format, self.channels(), nb_samples)
    }

    /// Like [`plane_size`](Self::plane_size), `None` on overflow.
    pub fn checked_plane_size(&self, nb_samples: usize) -> Option<usize> {
        checked_plane_size(self.sample_format, self.channels(), nb_samples)
    }
}

/// libswresample option names that change stream parameters.
const STREAM_OPTIONS: &[&str] = &[
    "ich",
    "in_channel_count",
    "och",
    "out_channel_count",
    "uch",
    "used_channel_count",
    "isr",
    "in_sample_rate",
    "osr",
    "out_sample_rate",
    "isf",
    "in_sample_fmt",
    "osf",
    "out_sample_fmt",
    "icl",
    "in_channel_layout",
    "ocl",
    "out_channel_layout",
    "ichl",
    "in_chlayout",
    "ochl",
    "out_chlayout",
    "uchl",
    "used_chlayout",
];

/// Reports whether setting `name` would change the stream parameters
/// tracked in [`Options`].
pub(crate) fn is_stream_option(name: &str) -> bool {
    STREAM_OPTIONS.contains(&name)
}

/// Everything a resampling context is allocated with.
///
/// ```rust
/// use libav_swresample::Options;
///
/// let opts = Options::from_yaml(
///     "output: { channel_layout: mono, sample_format: s16, sample_rate: 16000 }\n\
///      input: { channel_layout: stereo, sample_format: fltp, sample_rate: 48000 }\n",
/// )
/// .unwrap();
/// assert_eq!(opts.output.sample_rate, 16000);
/// assert_eq!(opts.log_offset, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub output: StreamSpec,
    pub input: StreamSpec,
    /// Integer slot forwarded verbatim to the allocator (the log level offset
    /// of `swr_alloc_set_opts`).
    #[serde(default)]
    pub log_offset: i32,
    /// Opaque tuning value captured at construction and passed through.
    #[serde(default)]
    pub aux: i32,
}

impl Options {
    pub const fn new(output: StreamSpec, input: StreamSpec) -> Self {
        Self {
            output,
            input,
            log_offset: 0,
            aux: 0,
        }
    }

    /// Same parameters on both sides.
    pub const fn passthrough(spec: StreamSpec) -> Self {
        Self::new(spec, spec)
    }

    pub const fn with_log_offset(mut self, log_offset: i32) -> Self {
        self.log_offset = log_offset;
        self
    }

    pub const fn with_aux(mut self, aux: i32) -> Self {
        self.aux = aux;
        self
    }

    /// Parses options from a YAML document.
    pub fn from_yaml(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Serializes options to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
