//! An in-process engine for tests.
//!
//! [`FakeEngine`] follows libswresample's call contract (status codes,
//! preconditions, buffering, flushing, delay and pts bookkeeping) without
//! linking FFmpeg. It converts only between streams that share a channel
//! layout and sample format, picking the nearest earlier input sample for
//! each output sample, so equal rates give a bit-exact copy.
//!
//! Clones share allocation counters and injected failures, which lets a test
//! keep one clone while a [`Context`](crate::Context) owns another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use libav_util::error::{
    averror, AVERROR_EINVAL, AVERROR_INPUT_CHANGED, AVERROR_OPTION_NOT_FOUND,
    AVERROR_OUTPUT_CHANGED, ENOSYS_LINUX, ERANGE,
};
use libav_util::{ChannelLayout, FrameAdapter, MemoryFrame, SampleFormat};

use crate::engine::Engine;
use crate::options::{Options, StreamSpec};

/// Integer options the fake accepts, a subset of libswresample's AVOptions.
const KNOWN_OPTIONS: &[&str] = &[
    "linear_interp",
    "phase_shift",
    "filter_size",
    "exact_rational",
    "dither_method",
    "resampler",
    "min_comp",
    "min_hard_comp",
    "comp_duration",
    "max_soft_comp",
    "async",
    "first_pts",
    "output_sample_bits",
    "matrix_encoding",
    "filter_type",
    "ich",
    "in_channel_count",
    "och",
    "out_channel_count",
    "uch",
    "used_channel_count",
];

/// Engine calls that can be made to fail with [`FakeEngine::fail_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Init,
    Convert,
    ConvertFrame,
    ConfigFrame,
    SetCompensation,
    SetChannelMapping,
    SetMatrix,
    DropOutput,
    InjectSilence,
    OutSamples,
    SetOption,
}

#[derive(Default)]
struct Shared {
    allocs: AtomicUsize,
    frees: AtomicUsize,
    refuse_alloc: AtomicBool,
    failures: Mutex<HashMap<Op, i32>>,
}

/// A pure Rust stand-in for libswresample.
#[derive(Clone, Default)]
pub struct FakeEngine {
    shared: Arc<Shared>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles allocated so far.
    pub fn allocs(&self) -> usize {
        self.shared.allocs.load(Ordering::SeqCst)
    }

    /// Number of handles freed so far.
    pub fn frees(&self) -> usize {
        self.shared.frees.load(Ordering::SeqCst)
    }

    /// Handles allocated and not yet freed.
    pub fn live(&self) -> usize {
        self.allocs() - self.frees()
    }

    /// Makes every following allocation fail (or succeed again).
    pub fn refuse_alloc(&self, refuse: bool) {
        self.shared.refuse_alloc.store(refuse, Ordering::SeqCst);
    }

    /// Makes the next call of `op` return `code` without doing anything.
    pub fn fail_next(&self, op: Op, code: i32) {
        self.shared
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op, code);
    }

    fn take_failure(&self, op: Op) -> Option<i32> {
        self.shared
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&op)
    }
}

/// Per-context state of the fake engine.
#[derive(Debug)]
pub struct FakeHandle {
    config: Options,
    initialized: bool,
    /// Buffered input bytes, one queue per plane.
    pending: Vec<Vec<u8>>,
    /// Buffered input samples per channel.
    pending_samples: usize,
    /// Read position into `pending`, in units of 1/out_rate input samples.
    phase: i64,
    drop: usize,
    outpts: i64,
    compensation: Option<(i32, i32)>,
    channel_map: Option<Vec<i32>>,
    matrix: Option<(Vec<f64>, i32)>,
    int_options: HashMap<String, i64>,
}

impl FakeHandle {
    fn new(config: Options) -> Self {
        Self {
            config,
            initialized: false,
            pending: Vec::new(),
            pending_samples: 0,
            phase: 0,
            drop: 0,
            outpts: 0,
            compensation: None,
            channel_map: None,
            matrix: None,
            int_options: HashMap::new(),
        }
    }

    /// Current configuration, including the pass-through `aux` value.
    pub fn config(&self) -> &Options {
        &self.config
    }

    pub fn compensation(&self) -> Option<(i32, i32)> {
        self.compensation
    }

    pub fn channel_map(&self) -> Option<&[i32]> {
        self.channel_map.as_deref()
    }

    pub fn matrix(&self) -> Option<(&[f64], i32)> {
        self.matrix.as_ref().map(|(m, s)| (m.as_slice(), *s))
    }

    pub fn int_option(&self, name: &str) -> Option<i64> {
        self.int_options.get(name).copied()
    }

    fn reset_buffers(&mut self) {
        self.pending = vec![Vec::new(); self.config.input.planes()];
        self.pending_samples = 0;
        self.phase = 0;
        self.drop = 0;
    }

    fn unit(&self) -> usize {
        self.config.input.plane_size(1)
    }

    fn push(&mut self, input: &[&[u8]], count: usize) {
        let bytes = self.unit() * count;
        for (queue, plane) in self.pending.iter_mut().zip(input) {
            queue.extend_from_slice(&plane[..bytes]);
        }
        self.pending_samples += count;
    }

    fn push_silence(&mut self, count: usize) {
        let bytes = self.unit() * count;
        let byte = self.config.input.sample_format.silence_byte();
        for queue in &mut self.pending {
            queue.resize(queue.len() + bytes, byte);
        }
        self.pending_samples += count;
    }

    /// Emits up to `out_count` samples, discarding pending drops first.
    fn produce(&mut self, out: &mut [&mut [u8]], out_count: usize) -> usize {
        let unit = self.unit();
        let in_rate = i64::from(self.config.input.sample_rate);
        let out_rate = i64::from(self.config.output.sample_rate);

        let index = |phase: i64| (phase / out_rate) as usize;
        while self.drop > 0 && index(self.phase) < self.pending_samples {
            self.drop -= 1;
            self.phase += in_rate;
        }

        let mut written = 0;
        while written < out_count {
            let src = index(self.phase);
            if src >= self.pending_samples {
                break;
            }
            for (queue, plane) in self.pending.iter().zip(out.iter_mut()) {
                plane[written * unit..(written + 1) * unit]
                    .copy_from_slice(&queue[src * unit..(src + 1) * unit]);
            }
            written += 1;
            self.phase += in_rate;
        }

        let consumed = index(self.phase).min(self.pending_samples);
        for queue in &mut self.pending {
            queue.drain(..consumed * unit);
        }
        self.pending_samples -= consumed;
        self.phase -= consumed as i64 * out_rate;
        written
    }

    /// Buffered input duration in units of `1 / base` seconds, rounded up.
    fn delay(&self, base: i64) -> i64 {
        let in_rate = i128::from(self.config.input.sample_rate);
        let out_rate = i128::from(self.config.output.sample_rate);
        if in_rate <= 0 || out_rate <= 0 {
            return 0;
        }
        let num = (self.pending_samples as i128 * out_rate - i128::from(self.phase)).max(0);
        let den = in_rate * out_rate;
        let delay = (num * i128::from(base) + den - 1) / den;
        delay.clamp(0, i128::from(i64::MAX)) as i64
    }

    fn estimate_out(&self, in_samples: usize) -> usize {
        let in_rate = i128::from(self.config.input.sample_rate);
        let out_rate = i128::from(self.config.output.sample_rate);
        if in_rate <= 0 {
            return 0;
        }
        let num = ((self.pending_samples + in_samples) as i128 * out_rate - i128::from(self.phase)).max(0);
        ((num + in_rate - 1) / in_rate) as usize
    }
}

fn valid_stream(spec: &StreamSpec) -> bool {
    spec.sample_rate > 0 && !spec.channel_layout.is_empty() && spec.sample_format.bytes_per_sample() > 0
}

impl Engine for FakeEngine {
    type Handle = FakeHandle;
    type Frame = MemoryFrame;

    fn alloc(&self, options: &Options) -> Option<FakeHandle> {
        if self.shared.refuse_alloc.load(Ordering::SeqCst) {
            return None;
        }
        if !valid_stream(&options.input) || !valid_stream(&options.output) {
            return None;
        }
        self.shared.allocs.fetch_add(1, Ordering::SeqCst);
        Some(FakeHandle::new(*options))
    }

    fn free(&self, _handle: FakeHandle) {
        self.shared.frees.fetch_add(1, Ordering::SeqCst);
    }

    fn init(&self, h: &mut FakeHandle) -> i32 {
        h.initialized = false;
        if let Some(code) = self.take_failure(Op::Init) {
            return code;
        }
        let (input, output) = (h.config.input, h.config.output);
        if !valid_stream(&input) || !valid_stream(&output) {
            return AVERROR_EINVAL;
        }
        if input.channel_layout != output.channel_layout || input.sample_format != output.sample_format {
            return averror(ENOSYS_LINUX);
        }
        if let Some(map) = &h.channel_map {
            let channels = input.channels() as i32;
            if map.iter().any(|&c| c < -1 || c >= channels) {
                return AVERROR_EINVAL;
            }
        }
        h.reset_buffers();
        h.initialized = true;
        0
    }

    fn is_initialized(&self, h: &FakeHandle) -> bool {
        h.initialized
    }

    fn close(&self, h: &mut FakeHandle) {
        h.initialized = false;
        h.reset_buffers();
    }

    fn convert(
        &self,
        h: &mut FakeHandle,
        out: &mut [&mut [u8]],
        out_count: i32,
        input: Option<&[&[u8]]>,
        in_count: i32,
    ) -> i32 {
        if let Some(code) = self.take_failure(Op::Convert) {
            return code;
        }
        if !h.initialized || out_count < 0 || in_count < 0 {
            return AVERROR_EINVAL;
        }
        if let Some(input) = input {
            h.push(input, in_count as usize);
        }
        h.produce(out, out_count as usize) as i32
    }

    fn convert_frame(&self, h: &mut FakeHandle, out: &mut MemoryFrame, input: Option<&MemoryFrame>) -> i32 {
        if let Some(code) = self.take_failure(Op::ConvertFrame) {
            return code;
        }
        if !h.initialized {
            let ret = configure(h, &*out, input);
            if ret < 0 {
                return ret;
            }
            let ret = self.init(h);
            if ret < 0 {
                return ret;
            }
        } else {
            if input.is_some_and(|f| StreamSpec::of_frame(f) != h.config.input) {
                return AVERROR_INPUT_CHANGED;
            }
            if StreamSpec::of_frame(&*out) != h.config.output {
                return AVERROR_OUTPUT_CHANGED;
            }
        }

        let in_count = input.map_or(0, FrameAdapter::nb_samples);
        let in_planes = match input {
            Some(frame) if in_count > 0 => match frame.buffer() {
                Some(buf) => Some(buf.planes()),
                None => return AVERROR_EINVAL,
            },
            _ => None,
        };
        if let Some(planes) = &in_planes {
            h.push(planes, in_count);
        }

        if !out.has_buffer() {
            let capacity = h.estimate_out(0);
            if capacity == 0 {
                return 0;
            }
            out.alloc_buffer(capacity);
        }
        let capacity = out.capacity();
        let written = match out.buffer_mut() {
            Some(buf) => h.produce(&mut buf.planes_mut(), capacity),
            None => 0,
        };
        out.set_nb_samples(written);
        0
    }

    fn config_frame(&self, h: &mut FakeHandle, out: &MemoryFrame, input: &MemoryFrame) -> i32 {
        if let Some(code) = self.take_failure(Op::ConfigFrame) {
            return code;
        }
        configure(h, out, Some(input))
    }

    fn next_pts(&self, h: &mut FakeHandle, pts: i64) -> i64 {
        if pts == i64::MIN {
            return h.outpts;
        }
        let base = i64::from(h.config.input.sample_rate) * i64::from(h.config.output.sample_rate);
        h.outpts = pts.saturating_sub(h.delay(base));
        h.outpts
    }

    fn set_compensation(&self, h: &mut FakeHandle, sample_delta: i32, distance: i32) -> i32 {
        if let Some(code) = self.take_failure(Op::SetCompensation) {
            return code;
        }
        if distance < 0 || (distance == 0 && sample_delta != 0) || !h.initialized {
            return AVERROR_EINVAL;
        }
        h.compensation = Some((sample_delta, distance));
        0
    }

    fn set_channel_mapping(&self, h: &mut FakeHandle, mapping: &[i32]) -> i32 {
        if let Some(code) = self.take_failure(Op::SetChannelMapping) {
            return code;
        }
        if h.initialized {
            return AVERROR_EINVAL;
        }
        h.channel_map = Some(mapping.to_vec());
        0
    }

    fn set_matrix(&self, h: &mut FakeHandle, matrix: &[f64], stride: i32) -> i32 {
        if let Some(code) = self.take_failure(Op::SetMatrix) {
            return code;
        }
        if h.initialized {
            return AVERROR_EINVAL;
        }
        h.matrix = Some((matrix.to_vec(), stride));
        0
    }

    fn drop_output(&self, h: &mut FakeHandle, count: i32) -> i32 {
        if let Some(code) = self.take_failure(Op::DropOutput) {
            return code;
        }
        if !h.initialized || count < 0 {
            return AVERROR_EINVAL;
        }
        h.drop += count as usize;
        h.produce(&mut [], 0);
        0
    }

    fn inject_silence(&self, h: &mut FakeHandle, count: i32) -> i32 {
        if let Some(code) = self.take_failure(Op::InjectSilence) {
            return code;
        }
        if count <= 0 {
            return 0;
        }
        if !h.initialized {
            return AVERROR_EINVAL;
        }
        h.push_silence(count as usize);
        0
    }

    fn get_delay(&self, h: &FakeHandle, base: i64) -> i64 {
        h.delay(base)
    }

    fn out_samples(&self, h: &FakeHandle, in_samples: i32) -> i32 {
        if let Some(code) = self.take_failure(Op::OutSamples) {
            return code;
        }
        if in_samples < 0 {
            return AVERROR_EINVAL;
        }
        h.estimate_out(in_samples as usize).min(i32::MAX as usize) as i32
    }

    fn set_option(&self, h: &mut FakeHandle, name: &str, value: i64) -> i32 {
        if let Some(code) = self.take_failure(Op::SetOption) {
            return code;
        }
        let Ok(narrow) = i32::try_from(value) else {
            return averror(ERANGE);
        };
        match name {
            "isf" | "in_sample_fmt" => h.config.input.sample_format = SampleFormat::from_raw(narrow),
            "osf" | "out_sample_fmt" => h.config.output.sample_format = SampleFormat::from_raw(narrow),
            "isr" | "in_sample_rate" => h.config.input.sample_rate = narrow,
            "osr" | "out_sample_rate" => h.config.output.sample_rate = narrow,
            "icl" | "in_channel_layout" => h.config.input.channel_layout = ChannelLayout::from_mask(value as u64),
            "ocl" | "out_channel_layout" => h.config.output.channel_layout = ChannelLayout::from_mask(value as u64),
            _ if KNOWN_OPTIONS.contains(&name) => {}
            _ => return AVERROR_OPTION_NOT_FOUND,
        }
        h.int_options.insert(name.to_string(), value);
        0
    }
}

/// Closes the handle and adopts the frames' stream parameters.
fn configure(h: &mut FakeHandle, out: &MemoryFrame, input: Option<&MemoryFrame>) -> i32 {
    h.initialized = false;
    let output = StreamSpec::of_frame(out);
    let input = input.map_or(h.config.input, StreamSpec::of_frame);
    if !valid_stream(&output) || !valid_stream(&input) {
        return AVERROR_EINVAL;
    }
    h.config.output = output;
    h.config.input = input;
    h.reset_buffers();
    0
}

impl<E: Engine<Handle = FakeHandle>> crate::Context<E> {
    /// Inspects the fake engine's per-context state, `None` once freed.
    pub fn fake_state(&self) -> Option<&FakeHandle> {
        self.handle()
    }
}
