use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn clear_rect_only_touches_rect() {
    let mut img = solid(4, 4, [255, 0, 0, 255]);
    clear_rect(
        &mut img,
        PixelRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        },
    );
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0, 255]);
}

#[test]
fn clear_rect_outside_surface_is_noop() {
    let mut img = solid(2, 2, [1, 2, 3, 255]);
    clear_rect(
        &mut img,
        PixelRect {
            x: 5,
            y: 5,
            width: 2,
            height: 2,
        },
    );
    assert!(img.pixels().all(|p| p.0 == [1, 2, 3, 255]));
}

#[test]
fn blit_keeps_canvas_under_transparent_patch_pixels() {
    let mut img = solid(3, 1, [255, 0, 0, 255]);
    let patch = [0, 0, 255, 255, 0, 0, 0, 0];
    blit_over(
        &mut img,
        PixelRect {
            x: 1,
            y: 0,
            width: 2,
            height: 1,
        },
        &patch,
    )
    .unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [255, 0, 0, 255]);
}

#[test]
fn blit_clips_overhanging_patch() {
    let mut img = solid(2, 2, [0, 0, 0, 0]);
    let patch = vec![9u8; 3 * 3 * 4];
    blit_over(
        &mut img,
        PixelRect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        },
        &patch,
    )
    .unwrap();
    assert_eq!(img.get_pixel(1, 1).0, [9, 9, 9, 9]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn blit_rejects_short_patch() {
    let mut img = solid(2, 2, [0, 0, 0, 0]);
    assert!(blit_over(&mut img, PixelRect::full(2, 2), &[0; 4]).is_err());
}

#[test]
fn restore_requires_matching_size() {
    let mut img = solid(2, 1, [0, 0, 0, 0]);
    restore(&mut img, &[1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [2, 2, 2, 2]);
    assert!(restore(&mut img, &[0; 4]).is_err());
}
