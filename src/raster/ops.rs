use crate::foundation::core::PixelRect;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::over_straight;
use image::RgbaImage;

/// Set every pixel inside `rect` (clipped to the surface) to transparent black.
pub(crate) fn clear_rect(surface: &mut RgbaImage, rect: PixelRect) {
    let (w, h) = surface.dimensions();
    let Some(r) = rect.clip_to(w, h) else {
        return;
    };
    let stride = w as usize * 4;
    let buf: &mut [u8] = surface;
    for y in r.y..r.y + r.height {
        let start = y as usize * stride + r.x as usize * 4;
        buf[start..start + r.width as usize * 4].fill(0);
    }
}

/// Draw an RGBA patch at `rect` with source-over blending.
///
/// `patch` holds `rect.width * rect.height` pixels; parts falling outside the surface are skipped.
pub(crate) fn blit_over(
    surface: &mut RgbaImage,
    rect: PixelRect,
    patch: &[u8],
) -> GifloomResult<()> {
    let expected = (rect.width as usize) * (rect.height as usize) * 4;
    if patch.len() != expected {
        return Err(GifloomError::decode(format!(
            "patch is {} bytes, expected {expected} for {}x{}",
            patch.len(),
            rect.width,
            rect.height
        )));
    }

    let (w, h) = surface.dimensions();
    let Some(clip) = rect.clip_to(w, h) else {
        return Ok(());
    };
    let stride = w as usize * 4;
    let patch_stride = rect.width as usize * 4;
    let buf: &mut [u8] = surface;

    for row in 0..clip.height as usize {
        let dst_start = (clip.y as usize + row) * stride + clip.x as usize * 4;
        let src_start = row * patch_stride;
        let dst = &mut buf[dst_start..dst_start + clip.width as usize * 4];
        let src = &patch[src_start..src_start + clip.width as usize * 4];
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let out = over_straight([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Overwrite the whole surface with a previously taken snapshot.
pub(crate) fn restore(surface: &mut RgbaImage, snapshot: &[u8]) -> GifloomResult<()> {
    let buf: &mut [u8] = surface;
    if buf.len() != snapshot.len() {
        return Err(GifloomError::surface(
            "snapshot size does not match the canvas surface",
        ));
    }
    buf.copy_from_slice(snapshot);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/ops.rs"]
mod tests;
