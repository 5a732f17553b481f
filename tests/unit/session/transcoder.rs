use super::*;

fn solid(w: u32, h: u32, px: [u8; 4], delay_ms: u32) -> RasterFrame {
    RasterFrame::new(w, h, px.repeat((w * h) as usize), delay_ms).unwrap()
}

fn gif_of(frames: &[RasterFrame]) -> Vec<u8> {
    encode_gif(frames, &EncodeOptions::default()).unwrap()
}

#[test]
fn decode_encode_round_trip_keeps_count_and_size() {
    let t = Transcoder::default();
    let frames = [
        solid(12, 7, [255, 0, 0, 255], 50),
        solid(12, 7, [0, 255, 0, 255], 60),
    ];
    let anim = t.decode(&t.encode(&frames, &EncodeOptions::default()).unwrap()).unwrap();
    assert_eq!((anim.width(), anim.height(), anim.frame_count()), (12, 7, 2));
    assert_eq!(anim.total_duration_ms(), 110);
}

#[test]
fn merge_names_the_failing_source() {
    let t = Transcoder::default();
    let good = gif_of(&[solid(4, 4, [1, 2, 3, 255], 100)]);
    let err = t
        .merge(&[good, b"not a gif".to_vec()], &MergeOptions::default())
        .unwrap_err();
    assert!(matches!(err, GifloomError::Decode(_)));
    assert!(err.to_string().contains("source 1"));
}

#[test]
fn merge_keeps_surface_errors_as_environment_errors() {
    let t = Transcoder::new(TranscoderOpts {
        pool: SurfacePoolOpts {
            max_surface_dim: 8,
            ..Default::default()
        },
        ..Default::default()
    });
    let small = gif_of(&[solid(4, 4, [1, 2, 3, 255], 100)]);
    let large = gif_of(&[solid(16, 4, [1, 2, 3, 255], 100)]);
    let err = t.merge(&[small, large], &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, GifloomError::Surface(_)));
    assert!(err.to_string().contains("source 1"));
}

#[test]
fn merge_rejects_empty_source_list_before_decoding() {
    let t = Transcoder::default();
    let sources: [&[u8]; 0] = [];
    let err = t.merge(&sources, &MergeOptions::default()).unwrap_err();
    assert!(err.to_string().contains("at least one source file is required"));
}

#[test]
fn recode_scales_every_frame() {
    let t = Transcoder::default();
    let src = gif_of(&[solid(20, 10, [9, 9, 9, 255], 100), solid(20, 10, [90, 9, 9, 255], 100)]);
    let opts = RecodeOptions {
        scale: 0.5,
        ..Default::default()
    };
    let anim = t.decode(&t.recode(&src, &opts).unwrap()).unwrap();
    assert_eq!((anim.width(), anim.height(), anim.frame_count()), (10, 5, 2));
}

#[test]
fn surfaces_are_returned_after_each_operation() {
    let t = Transcoder::default();
    let a = gif_of(&[solid(10, 10, [200, 0, 0, 255], 100)]);
    let b = gif_of(&[solid(20, 5, [0, 0, 200, 255], 100)]);
    t.merge(&[a, b], &MergeOptions::default()).unwrap();
    let stats = t.pool_stats();
    assert_eq!(stats.in_use, 0);
    assert!(stats.retained_surfaces > 0);
}

#[test]
fn deferred_timing_is_used_for_decode() {
    let t = Transcoder::new(TranscoderOpts {
        disposal_timing: DisposalTiming::Deferred,
        ..Default::default()
    });
    assert_eq!(t.opts().disposal_timing, DisposalTiming::Deferred);
    let anim = t.decode(&gif_of(&[solid(3, 3, [5, 5, 5, 255], 40)])).unwrap();
    assert_eq!(anim.frame_count(), 1);
}

#[test]
fn export_goes_through_the_session_pool() {
    let t = Transcoder::default();
    let anim = t.decode(&gif_of(&[solid(6, 6, [1, 1, 1, 255], 100)])).unwrap();
    let out = t.export_frames(&anim, &ExportOptions::default()).unwrap();
    assert_eq!(out.frame_count, 1);
    assert!(!out.archive.is_empty());
}
