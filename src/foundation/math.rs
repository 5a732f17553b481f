pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Straight-alpha source-over for a single RGBA8 pixel.
pub(crate) fn over_straight(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da_term = u32::from(dst[3]) * (255 - sa);
    let out_a_255 = sa * 255 + da_term;
    if out_a_255 == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da_term;
        out[i] = ((num + out_a_255 / 2) / out_a_255).min(255) as u8;
    }
    out[3] = ((out_a_255 + 127) / 255).min(255) as u8;
    out
}

/// Flatten a straight-alpha pixel onto opaque black.
pub(crate) fn flatten_on_black(px: [u8; 4]) -> [u8; 3] {
    let a = u16::from(px[3]);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
    ]
}

/// `round(1000 / fps)` in milliseconds, never below 1.
pub(crate) fn delay_ms_for_fps(fps: f64) -> u32 {
    (1000.0 / fps).round().max(1.0) as u32
}

/// `max(1, round(dim * factor))`.
pub(crate) fn scaled_dim(dim: u32, factor: f64) -> u32 {
    ((f64::from(dim) * factor).round() as u32).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
