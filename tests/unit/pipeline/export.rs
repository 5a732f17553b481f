use super::*;
use crate::foundation::core::RasterFrame;
use std::io::Read;

fn anim(frames: usize) -> DecodedAnimation {
    let frames = (0..frames)
        .map(|i| RasterFrame::new(8, 6, [i as u8 * 40, 10, 20, 255].repeat(48), 100).unwrap())
        .collect();
    DecodedAnimation::new(8, 6, frames).unwrap()
}

fn entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut f = zip.by_index(i).unwrap();
            let mut buf = Vec::new();
            f.read_to_end(&mut buf).unwrap();
            (f.name().to_string(), buf)
        })
        .collect()
}

#[test]
fn entry_names_are_one_based_and_zero_padded() {
    assert_eq!(entry_name("clip", 1, StillFormat::Png), "clip-frame-001.png");
    assert_eq!(entry_name("clip", 42, StillFormat::Jpg), "clip-frame-042.jpg");
    assert_eq!(entry_name("clip", 1000, StillFormat::Webp), "clip-frame-1000.webp");
}

#[test]
fn png_export_writes_every_frame_in_order() {
    let pool = SurfacePool::default();
    let out = export_animation(&pool, &anim(3), &ExportOptions::default()).unwrap();
    assert_eq!(out.frame_count, 3);

    let files = entries(&out.archive);
    let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        ["frames-frame-001.png", "frames-frame-002.png", "frames-frame-003.png"]
    );
    let second = image::load_from_memory(&files[1].1).unwrap().to_rgba8();
    assert_eq!(second.dimensions(), (8, 6));
    assert_eq!(second.get_pixel(0, 0).0, [40, 10, 20, 255]);
}

#[test]
fn jpeg_export_scales_frames() {
    let pool = SurfacePool::default();
    let opts = ExportOptions {
        format: StillFormat::Jpeg,
        quality: 0.5,
        scale: 0.5,
        base_name: "half".to_string(),
    };
    let out = export_animation(&pool, &anim(2), &opts).unwrap();
    let files = entries(&out.archive);
    assert_eq!(files[0].0, "half-frame-001.jpeg");
    let img = image::load_from_memory(&files[0].1).unwrap();
    assert_eq!((img.width(), img.height()), (4, 3));
}

#[test]
fn empty_animation_and_blank_base_name_are_rejected() {
    let pool = SurfacePool::default();
    let empty = DecodedAnimation::new(8, 6, Vec::new()).unwrap();
    assert!(matches!(
        export_animation(&pool, &empty, &ExportOptions::default()),
        Err(GifloomError::Input(_))
    ));

    let opts = ExportOptions {
        base_name: "  ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        export_animation(&pool, &anim(1), &opts),
        Err(GifloomError::Input(_))
    ));
}
