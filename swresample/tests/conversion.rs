use libav_swresample::{Context, FakeEngine, Op, Options, StreamSpec, SwrError};
use libav_util::{ChannelLayout, ErrorKind, SampleBuffer, SampleFormat};

fn ctx_for(opts: Options) -> (FakeEngine, Context<FakeEngine>) {
    let engine = FakeEngine::new();
    let ctx = Context::with_engine(engine.clone(), opts).unwrap();
    (engine, ctx)
}

fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 251) as u8).collect()
}

#[test]
fn test_convert_before_init_is_invalid_argument() {
    let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::S16, 16000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));

    let input = ramp(20);
    let mut out = vec![0u8; 20];
    let planes: [&[u8]; 1] = [&input];
    let err = ctx.convert(&mut [&mut out[..]], 10, Some(&planes[..]), 10).unwrap_err();
    assert_eq!(err.code(), Some(-22));
    assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));
}

#[test]
fn test_identity_packed_is_bit_exact() {
    let spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16, 44100);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let n = 256;
    let input = ramp(spec.plane_size(n));
    let mut out = vec![0u8; spec.plane_size(n)];
    let planes: [&[u8]; 1] = [&input];
    let written = ctx.convert(&mut [&mut out[..]], n, Some(&planes[..]), n).unwrap();
    assert_eq!(written, n);
    assert_eq!(out, input);
}

#[test]
fn test_identity_planar_is_bit_exact() {
    let spec = StreamSpec::new(ChannelLayout::LAYOUT_5POINT1, SampleFormat::FltP, 48000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let n = 480;
    let mut input = SampleBuffer::new(spec.channel_layout, spec.sample_format, n);
    for ch in 0..input.plane_count() {
        let data = ramp(spec.plane_size(n));
        input.plane_mut(ch).copy_from_slice(&data);
        input.plane_mut(ch)[0] = ch as u8;
    }
    let mut output = SampleBuffer::new(spec.channel_layout, spec.sample_format, n);

    let written = ctx
        .convert(&mut output.planes_mut(), n, Some(&input.planes()[..]), n)
        .unwrap();
    assert_eq!(written, n);
    assert_eq!(output, input);
}

#[test]
fn test_native_error_code_is_preserved() {
    let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::Flt, 8000);
    let (engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    engine.fail_next(Op::Convert, -22);
    let input = vec![0u8; 16];
    let mut out = vec![0u8; 16];
    let planes: [&[u8]; 1] = [&input];
    let err = ctx.convert(&mut [&mut out[..]], 4, Some(&planes[..]), 4).unwrap_err();
    assert_eq!(err, SwrError::Conversion(libav_util::AvError::from_code(-22)));
    assert_eq!(err.code(), Some(-22));

    // Only the next call fails.
    assert_eq!(ctx.convert(&mut [&mut out[..]], 4, Some(&planes[..]), 4), Ok(4));
}

#[test]
fn test_unknown_code_keeps_number() {
    let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::Flt, 8000);
    let (engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    engine.fail_next(Op::Convert, -123_456);
    let mut out = vec![0u8; 4];
    let err = ctx.convert(&mut [&mut out[..]], 1, None, 0).unwrap_err();
    assert_eq!(err.code(), Some(-123_456));
    assert_eq!(err.kind(), Some(ErrorKind::Other));
}

#[test]
fn test_buffer_then_flush() {
    let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::S16, 16000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let input = ramp(spec.plane_size(100));
    let planes: [&[u8]; 1] = [&input];
    // No output space: everything is buffered.
    assert_eq!(ctx.convert(&mut [], 0, Some(&planes[..]), 100), Ok(0));
    assert_eq!(ctx.get_delay(16000), Ok(100));

    let mut out = vec![0u8; spec.plane_size(100)];
    assert_eq!(ctx.convert(&mut [&mut out[..]], 100, None, 0), Ok(100));
    assert_eq!(out, input);
    assert_eq!(ctx.get_delay(16000), Ok(0));

    // Nothing left to drain.
    assert_eq!(ctx.convert(&mut [&mut out[..]], 100, None, 0), Ok(0));
}

#[test]
fn test_get_delay_is_pure() {
    let input_spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16, 44100);
    let output_spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16, 48000);
    let (_engine, mut ctx) = ctx_for(Options::new(output_spec, input_spec));
    ctx.init().unwrap();

    let input = ramp(input_spec.plane_size(441));
    let planes: [&[u8]; 1] = [&input];
    let mut out = vec![0u8; output_spec.plane_size(100)];
    ctx.convert(&mut [&mut out[..]], 100, Some(&planes[..]), 441).unwrap();

    let first = ctx.get_delay(44100).unwrap();
    let second = ctx.get_delay(44100).unwrap();
    assert_eq!(first, second);
    assert!(first > 0);
    // Same delay expressed at a finer base.
    assert!(ctx.get_delay(44100 * 48000).unwrap() >= first);
}

#[test]
fn test_next_pts_is_monotonic() {
    let input_spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::Flt, 44100);
    let output_spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::Flt, 48000);
    let (_engine, mut ctx) = ctx_for(Options::new(output_spec, input_spec));
    ctx.init().unwrap();

    let unit = 44100i64 * 48000;
    let chunk = 441;
    let input = vec![0u8; input_spec.plane_size(chunk)];
    let planes: [&[u8]; 1] = [&input];
    let mut out = vec![0u8; output_spec.plane_size(1024)];

    let mut last = i64::MIN;
    for i in 0..20 {
        let pts = i * chunk as i64 * 48000;
        let next = ctx.next_pts(pts).unwrap();
        assert!(next >= last, "pts went backwards: {next} < {last}");
        last = next;
        ctx.convert(&mut [&mut out[..]], 1024, Some(&planes[..]), chunk).unwrap();
    }
    assert!(last > 0 && last < 20 * unit);
}

#[test]
fn test_upsample_counts() {
    let input_spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::S16, 8000);
    let output_spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::S16, 16000);
    let (_engine, mut ctx) = ctx_for(Options::new(output_spec, input_spec));
    ctx.init().unwrap();

    assert_eq!(ctx.out_samples(80), Ok(160));

    let input = ramp(input_spec.plane_size(80));
    let planes: [&[u8]; 1] = [&input];
    let mut out = vec![0u8; output_spec.plane_size(160)];
    assert_eq!(ctx.convert(&mut [&mut out[..]], 160, Some(&planes[..]), 80), Ok(160));
    // Every input sample appears twice.
    assert_eq!(&out[..4], &input[..2].repeat(2)[..]);
}

#[test]
fn test_rejects_wrong_plane_count() {
    let spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16P, 8000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let input = vec![0u8; 20];
    let mut out_a = vec![0u8; 20];
    let mut out_b = vec![0u8; 20];
    let one_plane: [&[u8]; 1] = [&input];
    let err = ctx
        .convert(&mut [&mut out_a[..], &mut out_b[..]], 10, Some(&one_plane[..]), 10)
        .unwrap_err();
    assert!(matches!(err, SwrError::InvalidBuffer(_)));

    let two_planes: [&[u8]; 2] = [&input, &input];
    let err = ctx
        .convert(&mut [&mut out_a[..]], 10, Some(&two_planes[..]), 10)
        .unwrap_err();
    assert!(matches!(err, SwrError::InvalidBuffer(_)));
}

#[test]
fn test_rejects_short_planes() {
    let spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::S16, 8000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let input = vec![0u8; 40];
    let planes: [&[u8]; 1] = [&input];
    let mut short_out = vec![0u8; 39];
    assert!(matches!(
        ctx.convert(&mut [&mut short_out[..]], 10, Some(&planes[..]), 10),
        Err(SwrError::InvalidBuffer(_))
    ));

    let mut out = vec![0u8; 40];
    assert!(matches!(
        ctx.convert(&mut [&mut out[..]], 10, Some(&planes[..]), 11),
        Err(SwrError::InvalidBuffer(_))
    ));
}

#[test]
fn test_rejects_oversized_counts() {
    let spec = StreamSpec::new(ChannelLayout::STEREO, SampleFormat::Dbl, 8000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let input = vec![0u8; 32];
    let planes: [&[u8]; 1] = [&input];
    let mut out = vec![0u8; 32];
    assert!(matches!(
        ctx.convert(&mut [&mut out[..]], usize::MAX / 2, None, 0),
        Err(SwrError::InvalidBuffer(_))
    ));
    assert!(matches!(
        ctx.convert(&mut [&mut out[..]], 2, Some(&planes[..]), usize::MAX),
        Err(SwrError::InvalidBuffer(_))
    ));
    assert!(matches!(
        ctx.convert(&mut [&mut out[..]], i32::MAX as usize, None, 0),
        Err(SwrError::InvalidBuffer(_))
    ));
    assert_eq!(ctx.get_delay(8000), Ok(0));
}

#[test]
fn test_rejects_flush_with_count() {
    let spec = StreamSpec::new(ChannelLayout::MONO, SampleFormat::U8, 8000);
    let (_engine, mut ctx) = ctx_for(Options::passthrough(spec));
    ctx.init().unwrap();

    let mut out = vec![0u8; 4];
    assert!(matches!(
        ctx.convert(&mut [&mut out[..]], 4, None, 4),
        Err(SwrError::InvalidBuffer(_))
    ));
}
