use crate::encode::indexed::{EncodeOptions, encode_gif};
use crate::foundation::core::{DecodedAnimation, RasterFrame};
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::scaled_dim;
use crate::raster::resample::{fit_to_canvas, scale, validate_scale};
use crate::raster::surface_pool::SurfacePool;

/// Options for merging several animations into one GIF.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Delay fallback for frames without their own delay.
    pub fps: f64,
    /// Scale applied to every source before fitting.
    pub scale: f64,
    /// Loop forever (`true`) or play once.
    pub loop_forever: bool,
    /// Budget for the shared global palette.
    pub max_colors: u16,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            fps: 10.0,
            scale: 1.0,
            loop_forever: true,
            max_colors: 256,
        }
    }
}

/// A merged GIF plus its geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutput {
    /// Encoded GIF bytes.
    pub bytes: Vec<u8>,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Total number of frames across all sources.
    pub frame_count: usize,
}

/// Bounding box of every source after scaling, computed per axis.
pub fn merge_canvas_size(sources: &[DecodedAnimation], factor: f64) -> Option<(u32, u32)> {
    sources
        .iter()
        .map(|a| (scaled_dim(a.width(), factor), scaled_dim(a.height(), factor)))
        .reduce(|(w, h), (sw, sh)| (w.max(sw), h.max(sh)))
}

/// Merge decoded animations sequentially onto a shared canvas and encode with a global palette.
///
/// Sources play one after another in input order; every frame keeps its own delay.
pub fn merge_animations(
    pool: &SurfacePool,
    sources: &[DecodedAnimation],
    opts: &MergeOptions,
) -> GifloomResult<MergeOutput> {
    validate_scale(opts.scale)?;
    let Some((width, height)) = merge_canvas_size(sources, opts.scale) else {
        return Err(GifloomError::input("at least one source file is required"));
    };
    pool.admit(width, height)?;

    let total = sources.iter().map(DecodedAnimation::frame_count).sum();
    let mut frames: Vec<RasterFrame> = Vec::with_capacity(total);
    for anim in sources {
        for frame in anim.frames() {
            let scaled = scale(pool, frame, opts.scale)?;
            frames.push(fit_to_canvas(pool, &scaled, width, height)?);
        }
    }

    let encode_opts = EncodeOptions {
        fps: opts.fps,
        loop_forever: opts.loop_forever,
        max_colors: opts.max_colors,
        use_global_palette: true,
    };
    let bytes = encode_gif(&frames, &encode_opts)?;

    tracing::debug!(
        sources = sources.len(),
        frames = frames.len(),
        width,
        height,
        bytes = bytes.len(),
        "merged animations"
    );
    Ok(MergeOutput {
        bytes,
        width,
        height,
        frame_count: frames.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/merge.rs"]
mod tests;
