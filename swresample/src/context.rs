//! The resampling context façade.

use std::fmt;

use tracing::{debug, trace};

use crate::engine::Engine;
use crate::error::{check, SwrError};
use crate::options::{is_stream_option, Options, StreamSpec};

/// A resampling context owning one engine handle.
///
/// Lifecycle: allocated (uninitialized) → [`init`](Self::init) or
/// [`config_frame`](Self::config_frame) → initialized →
/// [`close`](Self::close) → uninitialized → [`free`](Self::free) → freed.
/// Every call after `free` returns [`SwrError::Freed`]. Dropping the
/// context frees the handle.
///
/// A context must be driven from one thread at a time.
pub struct Context<E: Engine> {
    engine: E,
    handle: Option<E::Handle>,
    options: Options,
}

impl<E: Engine> Context<E> {
    /// Allocates a context on `engine` configured with `options`.
    pub fn with_engine(engine: E, options: Options) -> Result<Self, SwrError> {
        let Some(handle) = engine.alloc(&options) else {
            debug!(?options, "swresample: allocation failed");
            return Err(SwrError::Allocation);
        };
        debug!(
            input = %StreamDisplay(&options.input),
            output = %StreamDisplay(&options.output),
            "swresample: context allocated"
        );
        Ok(Self {
            engine,
            handle: Some(handle),
            options,
        })
    }

    #[cfg(feature = "native")]
    pub(crate) fn from_parts(engine: E, handle: E::Handle, options: Options) -> Self {
        Self {
            engine,
            handle: Some(handle),
            options,
        }
    }

    /// Returns the stream parameters the context is currently configured
    /// with. Frame configuration updates them.
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_freed(&self) -> bool {
        self.handle.is_none()
    }

    /// Initializes the context after its parameters have been set.
    pub fn init(&mut self) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        status("init", self.engine.init(handle))?;
        debug!("swresample: initialized");
        Ok(())
    }

    /// Reports whether the context is initialized. A freed context is not.
    pub fn is_initialized(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| self.engine.is_initialized(h))
    }

    /// Closes the context so it is no longer initialized. The handle stays
    /// valid and can be configured and initialized again.
    pub fn close(&mut self) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        self.engine.close(handle);
        debug!("swresample: closed");
        Ok(())
    }

    /// Releases the native handle. Calling it again is a no-op.
    pub fn free(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.free(handle);
            debug!("swresample: freed");
        }
    }

    /// Converts `in_count` samples per channel from `input` into at most
    /// `out_count` samples per channel in `out`.
    ///
    /// Pass `None` (with `in_count == 0`) to drain buffered samples. `out`
    /// may be empty when `out_count == 0`, which only buffers the input.
    /// Returns the number of samples per channel written.
    pub fn convert(
        &mut self,
        out: &mut [&mut [u8]],
        out_count: usize,
        input: Option<&[&[u8]]>,
        in_count: usize,
    ) -> Result<usize, SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        let oc = c_count("out_count", out_count)?;
        let ic = c_count("in_count", in_count)?;

        if !(out.is_empty() && out_count == 0) {
            validate_planes("output", &self.options.output, out.iter().map(|p| p.len()), out_count)?;
        }
        match input {
            Some(planes) => {
                validate_planes("input", &self.options.input, planes.iter().map(|p| p.len()), in_count)?;
            }
            None if in_count != 0 => {
                return Err(SwrError::InvalidBuffer(format!(
                    "flush with in_count {in_count}, expected 0"
                )));
            }
            None => {}
        }

        let written = status("convert", self.engine.convert(handle, out, oc, input, ic))?;
        trace!(in_count, out_count, written, "swresample: converted");
        Ok(written as usize)
    }

    /// Converts a whole input frame into `out`, or drains when `input` is
    /// `None`. An uninitialized context configures and initializes itself
    /// from the frames first.
    pub fn convert_frame(&mut self, out: &mut E::Frame, input: Option<&E::Frame>) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        status("convert_frame", self.engine.convert_frame(handle, out, input))?;
        self.options.output = StreamSpec::of_frame(&*out);
        if let Some(input) = input {
            self.options.input = StreamSpec::of_frame(input);
        }
        trace!(input = input.is_some(), "swresample: converted frame");
        Ok(())
    }

    /// Reconfigures the context from frame descriptors without converting,
    /// then initializes it for the new parameters.
    pub fn config_frame(&mut self, out: &E::Frame, input: &E::Frame) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        // The engine closes the context while reconfiguring it.
        status("config_frame", self.engine.config_frame(handle, out, input))?;
        self.options.output = StreamSpec::of_frame(out);
        self.options.input = StreamSpec::of_frame(input);
        status("init", self.engine.init(handle))?;
        debug!(
            input = %StreamDisplay(&self.options.input),
            output = %StreamDisplay(&self.options.output),
            "swresample: configured from frames"
        );
        Ok(())
    }

    /// Activates soft compensation: `sample_delta` samples are added or
    /// removed over the next `distance` output samples.
    pub fn set_compensation(&mut self, sample_delta: i32, distance: i32) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        status("set_compensation", self.engine.set_compensation(handle, sample_delta, distance))?;
        Ok(())
    }

    /// Installs a custom input channel mapping, one source index per input
    /// channel (`-1` mutes a channel).
    pub fn set_channel_mapping(&mut self, mapping: &[i32]) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        let need = self.options.input.channels();
        if mapping.len() < need {
            return Err(SwrError::InvalidBuffer(format!(
                "channel mapping has {} entries, need {need}",
                mapping.len()
            )));
        }
        status("set_channel_mapping", self.engine.set_channel_mapping(handle, mapping))?;
        Ok(())
    }

    /// Installs a custom remix matrix: one row of `stride` coefficients per
    /// output channel, the first input-channel-count of them used.
    pub fn set_matrix(&mut self, matrix: &[f64], stride: usize) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        let c_stride = c_count("stride", stride)?;
        let in_ch = self.options.input.channels();
        let out_ch = self.options.output.channels();
        if stride < in_ch {
            return Err(SwrError::InvalidBuffer(format!(
                "matrix stride {stride} is less than {in_ch} input channels"
            )));
        }
        let need = stride
            .checked_mul(out_ch.saturating_sub(1))
            .and_then(|n| n.checked_add(in_ch))
            .ok_or_else(|| SwrError::InvalidBuffer(format!("matrix stride {stride} overflows")))?;
        if out_ch == 0 || matrix.len() < need {
            return Err(SwrError::InvalidBuffer(format!(
                "matrix has {} coefficients, need {need}",
                matrix.len()
            )));
        }
        status("set_matrix", self.engine.set_matrix(handle, matrix, c_stride))?;
        Ok(())
    }

    /// Discards the next `count` output samples.
    pub fn drop_output(&mut self, count: usize) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        let count = c_count("count", count)?;
        status("drop_output", self.engine.drop_output(handle, count))?;
        Ok(())
    }

    /// Injects `count` samples of silence and returns the native status
    /// unchanged (non-negative on success).
    pub fn inject_silence(&mut self, count: usize) -> Result<i32, SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        let count = c_count("count", count)?;
        Ok(self.engine.inject_silence(handle, count))
    }

    /// Returns the delay the next input sample will experience, in units of
    /// `1 / base` seconds. Pass the input rate to get input samples.
    pub fn get_delay(&self, base: i64) -> Result<i64, SwrError> {
        let handle = self.handle.as_ref().ok_or(SwrError::Freed)?;
        Ok(self.engine.get_delay(handle, base))
    }

    /// Converts an input timestamp to the output timestamp. Both are in
    /// units of `1 / (in_rate * out_rate)` seconds.
    pub fn next_pts(&mut self, pts: i64) -> Result<i64, SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        Ok(self.engine.next_pts(handle, pts))
    }

    /// Upper bound of samples per channel the next conversion of
    /// `in_samples` samples may output.
    pub fn out_samples(&self, in_samples: usize) -> Result<usize, SwrError> {
        let handle = self.handle.as_ref().ok_or(SwrError::Freed)?;
        let in_samples = c_count("in_samples", in_samples)?;
        let n = status("out_samples", self.engine.out_samples(handle, in_samples))?;
        Ok(n as usize)
    }

    /// Sets a named integer option such as `linear_interp` or
    /// `phase_shift`. Most options only take effect on the next `init`.
    ///
    /// Options that change the stream parameters (sample formats, rates,
    /// channel counts and layouts) are rejected with
    /// [`SwrError::InvalidOption`]; those are fixed by [`Options`] or by
    /// [`config_frame`](Self::config_frame).
    pub fn set_option(&mut self, name: &str, value: i64) -> Result<(), SwrError> {
        let handle = self.handle.as_mut().ok_or(SwrError::Freed)?;
        if name.is_empty() || name.contains('\0') || is_stream_option(name) {
            return Err(SwrError::InvalidOption(name.to_string()));
        }
        status("set_option", self.engine.set_option(handle, name, value))?;
        debug!(name, value, "swresample: option set");
        Ok(())
    }

    #[cfg(any(test, feature = "fake", feature = "native"))]
    pub(crate) fn handle(&self) -> Option<&E::Handle> {
        self.handle.as_ref()
    }
}

impl<E: Engine> Drop for Context<E> {
    fn drop(&mut self) {
        self.free();
    }
}

impl<E: Engine> fmt::Debug for Context<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .field("freed", &self.is_freed())
            .finish()
    }
}

fn status(op: &'static str, ret: i32) -> Result<i32, SwrError> {
    check(ret).inspect_err(|e| debug!(op, error = %e, "swresample: native call failed"))
}

fn c_count(what: &str, value: usize) -> Result<i32, SwrError> {
    i32::try_from(value)
        .map_err(|_| SwrError::InvalidBuffer(format!("{what} {value} does not fit a C int")))
}

fn validate_planes(
    side: &str,
    spec: &StreamSpec,
    plane_lens: impl ExactSizeIterator<Item = usize>,
    count: usize,
) -> Result<(), SwrError> {
    let planes = spec.planes();
    if plane_lens.len() != planes {
        return Err(SwrError::InvalidBuffer(format!(
            "{side} has {} planes, {} needs {planes}",
            plane_lens.len(),
            StreamDisplay(spec)
        )));
    }
    let need = spec.checked_plane_size(count).ok_or_else(|| {
        SwrError::InvalidBuffer(format!("{side} size of {count} samples overflows"))
    })?;
    for (i, len) in plane_lens.enumerate() {
        if len < need {
            return Err(SwrError::InvalidBuffer(format!(
                "{side} plane {i} holds {len} bytes, {count} samples need {need}"
            )));
        }
    }
    Ok(())
}

struct StreamDisplay<'a>(&'a StreamSpec);

impl fmt::Display for StreamDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}Hz",
            self.0.channel_layout, self.0.sample_format, self.0.sample_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libav_util::{ChannelLayout, SampleFormat};

    const S16_STEREO: StreamSpec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16, 44100);
    const FLTP_STEREO: StreamSpec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::FltP, 44100);

    #[test]
    fn test_validate_packed() {
        assert!(validate_planes("input", &S16_STEREO, [400].into_iter(), 100).is_ok());
        assert!(validate_planes("input", &S16_STEREO, [399].into_iter(), 100).is_err());
        assert!(validate_planes("input", &S16_STEREO, [400, 400].into_iter(), 100).is_err());
    }

    #[test]
    fn test_validate_planar() {
        assert!(validate_planes("output", &FLTP_STEREO, [400, 400].into_iter(), 100).is_ok());
        let err = validate_planes("output", &FLTP_STEREO, [400, 12].into_iter(), 100).unwrap_err();
        assert!(matches!(err, SwrError::InvalidBuffer(msg) if msg.contains("plane 1")));
    }

    #[test]
    fn test_validate_overflow() {
        let err = validate_planes("output", &S16_STEREO, [400].into_iter(), usize::MAX / 2).unwrap_err();
        assert!(matches!(err, SwrError::InvalidBuffer(msg) if msg.contains("overflows")));
    }

    #[test]
    fn test_c_count() {
        assert_eq!(c_count("n", 5), Ok(5));
        assert!(c_count("n", usize::MAX).is_err());
    }

    #[test]
    fn test_stream_display() {
        assert_eq!(StreamDisplay(&FLTP_STEREO).to_string(), "stereo fltp 44100Hz");
    }
}
