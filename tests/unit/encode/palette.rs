use super::*;

fn gradient(w: u32, h: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            out.extend_from_slice(&[(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8, 255]);
        }
    }
    out
}

#[test]
fn palette_never_exceeds_budget() {
    let px = gradient(40, 40);
    for max in [2usize, 3, 7, 16, 64, 200, 255, 256] {
        let p = quantize(&px, max, ColorFormat::Opaque).unwrap();
        assert!(p.len() <= max, "budget {max} produced {}", p.len());
        assert!(p.len() >= 2);
        let idx = p.apply(&px);
        assert_eq!(idx.len(), 40 * 40);
        assert!(idx.iter().all(|&i| (i as usize) < p.len()));
    }
}

#[test]
fn budget_is_clamped_to_gif_range() {
    let px = gradient(40, 40);
    assert!(quantize(&px, 0, ColorFormat::Opaque).unwrap().len() <= 2);
    assert!(quantize(&px, 10_000, ColorFormat::Opaque).unwrap().len() <= 256);
}

#[test]
fn few_colors_are_kept_exactly_in_first_seen_order() {
    let px = [
        10, 20, 30, 255, //
        1, 2, 3, 255, //
        10, 20, 30, 255, //
        9, 9, 9, 255,
    ];
    let p = quantize(&px, 256, ColorFormat::Opaque).unwrap();
    assert_eq!(
        p.colors(),
        &[[10, 20, 30, 255], [1, 2, 3, 255], [9, 9, 9, 255]]
    );
    assert_eq!(p.apply(&px), vec![0, 1, 0, 2]);
    assert_eq!(p.transparent_index(), None);
}

#[test]
fn single_color_is_padded_to_two_entries() {
    let px = [5, 5, 5, 255].repeat(9);
    let p = quantize(&px, 16, ColorFormat::Opaque).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.colors()[0], [5, 5, 5, 255]);
    assert_eq!(p.colors()[1], [0, 0, 0, 255]);
}

#[test]
fn alpha_aware_exact_palette_has_transparent_slot() {
    let px = [
        255, 0, 0, 255, //
        0, 0, 0, 0, //
        7, 7, 7, 10, //
        0, 255, 0, 200,
    ];
    let p = quantize(&px, 256, ColorFormat::AlphaAware).unwrap();
    assert_eq!(p.transparent_index(), Some(1));
    // low alpha snaps to the shared transparent entry, high alpha becomes opaque
    assert_eq!(p.apply(&px), vec![0, 1, 1, 2]);
    assert_eq!(p.colors()[2], [0, 255, 0, 255]);
}

#[test]
fn reduced_alpha_aware_palette_reserves_transparent_slot_within_budget() {
    let mut px = gradient(40, 40);
    for chunk in px.chunks_exact_mut(4).step_by(3) {
        chunk[3] = 0;
    }
    for max in [2usize, 3, 16, 256] {
        let p = quantize(&px, max, ColorFormat::AlphaAware).unwrap();
        assert!(p.len() <= max);
        let t = p.transparent_index().expect("transparent slot");
        assert_eq!(p.colors()[t as usize][3], 0);
        assert_eq!(p.index_of(&[1, 2, 3, 0]), t);
        assert_ne!(p.index_of(&[200, 10, 10, 255]), t);
    }
}

#[test]
fn opaque_format_ignores_alpha() {
    let px = [1, 2, 3, 0, 1, 2, 3, 255];
    let p = quantize(&px, 8, ColorFormat::Opaque).unwrap();
    assert_eq!(p.transparent_index(), None);
    assert_eq!(p.apply(&px), vec![0, 0]);
}

#[test]
fn unknown_pixel_maps_to_nearest_entry() {
    let px = [0, 0, 0, 255, 250, 250, 250, 255];
    let p = quantize(&px, 4, ColorFormat::Opaque).unwrap();
    assert_eq!(p.index_of(&[240, 240, 240, 255]), 1);
    assert_eq!(p.index_of(&[12, 3, 3, 255]), 0);
}

#[test]
fn detect_scans_all_buffers() {
    let opaque = [1u8, 2, 3, 255];
    let soft = [1u8, 2, 3, 254];
    assert_eq!(
        ColorFormat::detect([&opaque[..], &opaque[..]]),
        ColorFormat::Opaque
    );
    assert_eq!(
        ColorFormat::detect([&opaque[..], &soft[..]]),
        ColorFormat::AlphaAware
    );
}

#[test]
fn rejects_partial_pixels() {
    assert!(quantize(&[1, 2, 3], 16, ColorFormat::Opaque).is_err());
}
