//! Frame resampling: uniform scaling and aspect-preserving fit onto a fixed canvas.

use crate::foundation::core::RasterFrame;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::scaled_dim;
use crate::raster::surface_pool::SurfacePool;
use image::imageops::{self, FilterType};

const FILTER: FilterType = FilterType::CatmullRom;

pub(crate) fn validate_scale(factor: f64) -> GifloomResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(GifloomError::input(format!(
            "scale factor must be a positive finite number, got {factor}"
        )));
    }
    Ok(())
}

/// Scale a frame by `factor`. Target size is `max(1, round(dim * factor))` per axis.
///
/// The input is left untouched; the delay is carried over. The pool only checks the target size:
/// the scaled buffer is allocated by `imageops::resize`, outside the pool.
pub fn scale(pool: &SurfacePool, frame: &RasterFrame, factor: f64) -> GifloomResult<RasterFrame> {
    validate_scale(factor)?;
    frame.ensure_consistent()?;
    let w = scaled_dim(frame.width, factor);
    let h = scaled_dim(frame.height, factor);
    resize_to(pool, frame, w, h)
}

/// Scale a frame to exactly `width x height` (no aspect preservation). Allocates outside the pool.
pub(crate) fn resize_to(
    pool: &SurfacePool,
    frame: &RasterFrame,
    width: u32,
    height: u32,
) -> GifloomResult<RasterFrame> {
    pool.admit(width, height)?;
    if width == frame.width && height == frame.height {
        return Ok(frame.clone());
    }
    let src = frame.to_image()?;
    let out = imageops::resize(&src, width, height, FILTER);
    Ok(RasterFrame::from_image(out, frame.delay_ms))
}

/// Letterbox a frame onto a transparent `target_width x target_height` canvas.
///
/// The frame is scaled by `min(tw / sw, th / sh)` and centered; padding stays fully transparent.
pub fn fit_to_canvas(
    pool: &SurfacePool,
    frame: &RasterFrame,
    target_width: u32,
    target_height: u32,
) -> GifloomResult<RasterFrame> {
    frame.ensure_consistent()?;
    if frame.width == target_width && frame.height == target_height {
        pool.admit(target_width, target_height)?;
        return Ok(frame.clone());
    }

    let mut canvas = pool.acquire(target_width, target_height)?;

    let s = (f64::from(target_width) / f64::from(frame.width))
        .min(f64::from(target_height) / f64::from(frame.height));
    let draw_w = scaled_dim(frame.width, s).min(target_width);
    let draw_h = scaled_dim(frame.height, s).min(target_height);
    let fitted = resize_to(pool, frame, draw_w, draw_h)?.into_image()?;

    let x = i64::from((target_width - draw_w) / 2);
    let y = i64::from((target_height - draw_h) / 2);
    imageops::replace(&mut *canvas, &fitted, x, y);

    tracing::trace!(
        src_w = frame.width,
        src_h = frame.height,
        draw_w,
        draw_h,
        target_width,
        target_height,
        "fit_to_canvas"
    );

    RasterFrame::new(target_width, target_height, canvas.snapshot(), frame.delay_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/resample.rs"]
mod tests;
