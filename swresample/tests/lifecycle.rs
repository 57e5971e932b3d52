use libav_swresample::{Context, FakeEngine, Op, Options, StreamSpec, SwrError};
use libav_util::{ChannelLayout, ErrorKind, MemoryFrame, SampleFormat};

fn spec(layout: ChannelLayout, format: SampleFormat, rate: i32) -> StreamSpec {
    StreamSpec::new(layout, format, rate)
}

fn stereo_s16(rate: i32) -> StreamSpec {
    spec(ChannelLayout::STEREO, SampleFormat::S16, rate)
}

#[test]
fn test_construct_free_leaves_no_handles() {
    let engine = FakeEngine::new();
    let combos = [
        Options::passthrough(stereo_s16(44100)),
        Options::new(stereo_s16(48000), stereo_s16(44100)),
        Options::new(
            spec(ChannelLayout::MONO, SampleFormat::FltP, 16000),
            spec(ChannelLayout::LAYOUT_5POINT1, SampleFormat::S32, 48000),
        ),
        Options::passthrough(spec(ChannelLayout::QUAD, SampleFormat::DblP, 96000)).with_aux(3),
    ];

    for opts in combos {
        let mut ctx = Context::with_engine(engine.clone(), opts).unwrap();
        assert_eq!(engine.live(), 1);
        ctx.free();
        assert_eq!(engine.live(), 0);
    }
    assert_eq!(engine.allocs(), 4);
    assert_eq!(engine.frees(), 4);
}

#[test]
fn test_drop_frees_handle() {
    let engine = FakeEngine::new();
    {
        let mut ctx = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(8000))).unwrap();
        ctx.init().unwrap();
        assert_eq!(engine.live(), 1);
    }
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_drop_frees_on_error_path() {
    fn run(engine: &FakeEngine) -> Result<(), SwrError> {
        let mut ctx = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(8000)))?;
        ctx.init()?;
        ctx.set_compensation(5, 0)?;
        Ok(())
    }

    let engine = FakeEngine::new();
    let err = run(&engine).unwrap_err();
    assert_eq!(err.code(), Some(-22));
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_free_is_idempotent() {
    let engine = FakeEngine::new();
    let mut ctx = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(8000))).unwrap();
    ctx.free();
    ctx.free();
    drop(ctx);
    assert_eq!(engine.frees(), 1);
}

#[test]
fn test_allocation_error() {
    let engine = FakeEngine::new();
    engine.refuse_alloc(true);
    let err = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(8000))).unwrap_err();
    assert_eq!(err, SwrError::Allocation);
    assert_eq!(engine.allocs(), 0);

    engine.refuse_alloc(false);
    let bad_rate = Options::new(stereo_s16(0), stereo_s16(8000));
    assert_eq!(
        Context::with_engine(engine.clone(), bad_rate).unwrap_err(),
        SwrError::Allocation
    );
    let bad_format = Options::passthrough(spec(ChannelLayout::STEREO, SampleFormat::None, 8000));
    assert_eq!(
        Context::with_engine(engine.clone(), bad_format).unwrap_err(),
        SwrError::Allocation
    );
    assert_eq!(engine.live(), 0);
}

#[test]
fn test_is_initialized_transitions() {
    let mut ctx = Context::with_engine(FakeEngine::new(), Options::passthrough(stereo_s16(44100))).unwrap();
    assert!(!ctx.is_initialized());

    ctx.init().unwrap();
    assert!(ctx.is_initialized());

    ctx.close().unwrap();
    assert!(!ctx.is_initialized());

    // The handle is reusable after close.
    ctx.init().unwrap();
    assert!(ctx.is_initialized());

    ctx.free();
    assert!(!ctx.is_initialized());
}

#[test]
fn test_failed_init_stays_uninitialized() {
    let engine = FakeEngine::new();
    let mut ctx = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(44100))).unwrap();

    engine.fail_next(Op::Init, -12);
    let err = ctx.init().unwrap_err();
    assert_eq!(err.code(), Some(-12));
    assert_eq!(err.kind(), Some(ErrorKind::OutOfMemory));
    assert!(!ctx.is_initialized());

    ctx.init().unwrap();
    assert!(ctx.is_initialized());

    // A failed re-init drops the previous initialization.
    engine.fail_next(Op::Init, -22);
    assert!(ctx.init().is_err());
    assert!(!ctx.is_initialized());
}

#[test]
fn test_unsupported_conversion_fails_init() {
    let opts = Options::new(
        spec(ChannelLayout::MONO, SampleFormat::S16, 16000),
        spec(ChannelLayout::STEREO, SampleFormat::S16, 16000),
    );
    let mut ctx = Context::with_engine(FakeEngine::new(), opts).unwrap();
    let err = ctx.init().unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotImplemented));
    assert!(!ctx.is_initialized());
}

#[test]
fn test_calls_after_free_fail_fast() {
    let engine = FakeEngine::new();
    let mut ctx = Context::with_engine(engine.clone(), Options::passthrough(stereo_s16(8000))).unwrap();
    ctx.init().unwrap();
    ctx.free();
    assert!(ctx.is_freed());

    let input = [0u8; 8];
    let mut out = [0u8; 8];
    let planes: [&[u8]; 1] = [&input];
    let mut frame = MemoryFrame::new(ChannelLayout::STEREO, SampleFormat::S16, 8000);
    let in_frame = MemoryFrame::new(ChannelLayout::STEREO, SampleFormat::S16, 8000);

    assert_eq!(ctx.init(), Err(SwrError::Freed));
    assert_eq!(ctx.close(), Err(SwrError::Freed));
    assert_eq!(ctx.convert(&mut [&mut out[..]], 2, Some(&planes[..]), 2), Err(SwrError::Freed));
    assert_eq!(ctx.convert_frame(&mut frame, Some(&in_frame)), Err(SwrError::Freed));
    assert_eq!(ctx.config_frame(&frame, &in_frame), Err(SwrError::Freed));
    assert_eq!(ctx.set_compensation(1, 100), Err(SwrError::Freed));
    assert_eq!(ctx.set_channel_mapping(&[0, 1]), Err(SwrError::Freed));
    assert_eq!(ctx.set_matrix(&[1.0, 0.0, 0.0, 1.0], 2), Err(SwrError::Freed));
    assert_eq!(ctx.drop_output(1), Err(SwrError::Freed));
    assert_eq!(ctx.inject_silence(1), Err(SwrError::Freed));
    assert_eq!(ctx.get_delay(8000), Err(SwrError::Freed));
    assert_eq!(ctx.next_pts(0), Err(SwrError::Freed));
    assert_eq!(ctx.out_samples(10), Err(SwrError::Freed));
    assert_eq!(ctx.set_option("linear_interp", 1), Err(SwrError::Freed));
    assert!(!ctx.is_initialized());
    assert!(ctx.fake_state().is_none());

    assert_eq!(engine.frees(), 1);
}

#[test]
fn test_aux_is_passed_through() {
    let opts = Options::passthrough(stereo_s16(8000)).with_log_offset(2).with_aux(41);
    let ctx = Context::with_engine(FakeEngine::new(), opts).unwrap();
    let config = ctx.fake_state().unwrap().config();
    assert_eq!(config.aux, 41);
    assert_eq!(config.log_offset, 2);
    assert_eq!(ctx.options(), &opts);
}

#[test]
fn test_debug_output() {
    let mut ctx = Context::with_engine(FakeEngine::new(), Options::passthrough(stereo_s16(8000))).unwrap();
    assert!(format!("{ctx:?}").contains("freed: false"));
    ctx.free();
    assert!(format!("{ctx:?}").contains("freed: true"));
}
