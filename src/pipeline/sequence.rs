use crate::encode::still::load_still;
use crate::foundation::core::RasterFrame;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::delay_ms_for_fps;
use crate::raster::resample::{fit_to_canvas, scale, validate_scale};
use crate::raster::surface_pool::SurfacePool;

/// Options for [`images_to_frames`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Uniform scale factor; values above 1 upscale.
    pub scale: f64,
    /// Playback rate, clamped to `1..=60`.
    pub fps: f64,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fps: 10.0,
        }
    }
}

/// Uniform per-frame delay for a still sequence.
pub(crate) fn sequence_delay_ms(fps: f64) -> u32 {
    let fps = if fps.is_nan() { 1.0 } else { fps.clamp(1.0, 60.0) };
    delay_ms_for_fps(fps)
}

/// Turn still images into equally timed frames on one canvas.
///
/// The first image, scaled, fixes the canvas size; later images are scaled the same way and
/// letterboxed onto that canvas when their size differs. Any image that fails to load fails the
/// whole batch.
pub fn images_to_frames<B: AsRef<[u8]>>(
    pool: &SurfacePool,
    images: &[B],
    opts: &SequenceOptions,
) -> GifloomResult<Vec<RasterFrame>> {
    if images.is_empty() {
        return Err(GifloomError::input("at least one image is required"));
    }
    validate_scale(opts.scale)?;
    let delay_ms = sequence_delay_ms(opts.fps);

    let mut frames: Vec<RasterFrame> = Vec::with_capacity(images.len());
    for (i, bytes) in images.iter().enumerate() {
        let still = load_still(bytes.as_ref(), delay_ms)
            .map_err(|e| GifloomError::decode(format!("image {i}: {e}")))?;
        let scaled = scale(pool, &still, opts.scale)?;

        let frame = match frames.first() {
            Some(canon) if (scaled.width, scaled.height) != (canon.width, canon.height) => {
                fit_to_canvas(pool, &scaled, canon.width, canon.height)?
            }
            _ => scaled,
        };
        frames.push(frame);
    }

    if let Some(first) = frames.first() {
        tracing::debug!(
            frames = frames.len(),
            width = first.width,
            height = first.height,
            delay_ms,
            "built still sequence"
        );
    }
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/sequence.rs"]
mod tests;
