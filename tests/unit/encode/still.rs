use super::*;

fn checker(w: u32, h: u32) -> RasterFrame {
    let mut px = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                px.extend_from_slice(&[250, 250, 250, 255]);
            } else {
                px.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    RasterFrame::new(w, h, px, 10).unwrap()
}

#[test]
fn format_parsing_accepts_aliases() {
    assert_eq!("PNG".parse::<StillFormat>().unwrap(), StillFormat::Png);
    assert_eq!("jpg".parse::<StillFormat>().unwrap(), StillFormat::Jpg);
    assert_eq!(" jpeg ".parse::<StillFormat>().unwrap(), StillFormat::Jpeg);
    assert_eq!("webp".parse::<StillFormat>().unwrap(), StillFormat::Webp);
    assert!("bmp".parse::<StillFormat>().is_err());
}

#[test]
fn extensions_and_mimes() {
    assert_eq!(StillFormat::Jpg.extension(), "jpg");
    assert_eq!(StillFormat::Jpeg.extension(), "jpeg");
    assert_eq!(StillFormat::Jpg.mime(), "image/jpeg");
    assert_eq!(StillFormat::Webp.mime(), "image/webp");
}

#[test]
fn quality_is_clamped() {
    assert_eq!(jpeg_quality(0.92), 92);
    assert_eq!(jpeg_quality(7.0), 100);
    assert_eq!(jpeg_quality(-1.0), 10);
    assert_eq!(jpeg_quality(f32::NAN), 100);
}

#[test]
fn png_round_trip_is_lossless() {
    let f = checker(5, 3);
    let bytes = encode_still(&f, StillFormat::Png, 0.0).unwrap();
    let back = load_still(&bytes, 10).unwrap();
    assert_eq!(back, f);
}

#[test]
fn webp_round_trip_is_lossless() {
    let f = checker(4, 4);
    let bytes = encode_still(&f, StillFormat::Webp, 0.5).unwrap();
    assert_eq!(&bytes[..4], b"RIFF");
    let back = load_still(&bytes, 10).unwrap();
    assert_eq!((back.width, back.height), (4, 4));
    assert_eq!(&back.pixels[..4], &[250, 250, 250, 255]);
}

#[test]
fn jpeg_is_opaque_and_sized() {
    let f = checker(8, 8);
    let bytes = encode_still(&f, StillFormat::Jpeg, 0.9).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let back = load_still(&bytes, 0).unwrap();
    assert_eq!((back.width, back.height), (8, 8));
    assert!(!back.has_transparency());
}

#[test]
fn load_rejects_garbage() {
    assert!(matches!(
        load_still(b"nope", 0),
        Err(GifloomError::Decode(_))
    ));
}
