use crate::decode::{DisposalTiming, decode_gif};
use crate::encode::indexed::{EncodeOptions, encode_gif};
use crate::foundation::core::{DecodedAnimation, RasterFrame};
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::pipeline::export::{ExportOptions, ExportOutput, export_animation};
use crate::pipeline::merge::{MergeOptions, MergeOutput, merge_animations};
use crate::pipeline::sequence::{SequenceOptions, images_to_frames};
use crate::raster::resample::scale;
use crate::raster::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};

/// Options for a [`Transcoder`] session.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TranscoderOpts {
    /// Surface pool limits.
    pub pool: SurfacePoolOpts,
    /// How GIF disposal modes are applied while decoding.
    pub disposal_timing: DisposalTiming,
}

/// Options for [`Transcoder::recode`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecodeOptions {
    /// Scale applied to every decoded frame.
    pub scale: f64,
    /// Encoder settings for the output.
    pub encode: EncodeOptions,
}

impl Default for RecodeOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            encode: EncodeOptions::default(),
        }
    }
}

/// A transcoding session: owns the surface pool every operation draws from.
///
/// All entry points take `&self`; frames are processed strictly in source order, one at a time.
/// The session is `!Sync` because its pool is; create one per thread.
pub struct Transcoder {
    pool: SurfacePool,
    opts: TranscoderOpts,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(TranscoderOpts::default())
    }
}

impl Transcoder {
    /// Create a session with an empty pool.
    pub fn new(opts: TranscoderOpts) -> Self {
        Self {
            pool: SurfacePool::new(opts.pool),
            opts,
        }
    }

    /// Session options.
    pub fn opts(&self) -> TranscoderOpts {
        self.opts
    }

    /// The session's surface pool.
    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    /// Snapshot of the pool counters.
    pub fn pool_stats(&self) -> SurfacePoolStats {
        self.pool.stats()
    }

    /// Decode GIF bytes into full-canvas RGBA frames.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn decode(&self, bytes: &[u8]) -> GifloomResult<DecodedAnimation> {
        let anim = decode_gif(&self.pool, bytes, self.opts.disposal_timing)?;
        tracing::debug!(
            width = anim.width(),
            height = anim.height(),
            frames = anim.frame_count(),
            total_duration_ms = anim.total_duration_ms(),
            "decoded"
        );
        Ok(anim)
    }

    /// Encode RGBA frames into animated GIF bytes.
    #[tracing::instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn encode(&self, frames: &[RasterFrame], opts: &EncodeOptions) -> GifloomResult<Vec<u8>> {
        encode_gif(frames, opts)
    }

    /// Decode GIF sources and merge them sequentially into one GIF.
    ///
    /// A source that fails to decode fails the whole merge.
    #[tracing::instrument(skip(self, sources), fields(sources = sources.len()))]
    pub fn merge<B: AsRef<[u8]>>(
        &self,
        sources: &[B],
        opts: &MergeOptions,
    ) -> GifloomResult<MergeOutput> {
        if sources.is_empty() {
            return Err(GifloomError::input("at least one source file is required"));
        }
        let anims = sources
            .iter()
            .enumerate()
            .map(|(i, bytes)| {
                decode_gif(&self.pool, bytes.as_ref(), self.opts.disposal_timing)
                    .map_err(|e| with_source_index(e, i))
            })
            .collect::<GifloomResult<Vec<_>>>()?;
        self.merge_animations(&anims, opts)
    }

    /// Merge already decoded animations into one GIF.
    pub fn merge_animations(
        &self,
        sources: &[DecodedAnimation],
        opts: &MergeOptions,
    ) -> GifloomResult<MergeOutput> {
        let out = merge_animations(&self.pool, sources, opts)?;
        tracing::debug!(pool = ?self.pool.stats(), "merge done");
        Ok(out)
    }

    /// Load still images and turn them into an equally timed frame sequence.
    #[tracing::instrument(skip(self, images), fields(images = images.len()))]
    pub fn images_to_frames<B: AsRef<[u8]>>(
        &self,
        images: &[B],
        opts: &SequenceOptions,
    ) -> GifloomResult<Vec<RasterFrame>> {
        images_to_frames(&self.pool, images, opts)
    }

    /// Export every frame of an animation as a still image inside a zip archive.
    #[tracing::instrument(
        skip(self, anim, opts),
        fields(frames = anim.frame_count(), format = ?opts.format)
    )]
    pub fn export_frames(
        &self,
        anim: &DecodedAnimation,
        opts: &ExportOptions,
    ) -> GifloomResult<ExportOutput> {
        export_animation(&self.pool, anim, opts)
    }

    /// Decode a GIF, rescale its frames and encode it again.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn recode(&self, bytes: &[u8], opts: &RecodeOptions) -> GifloomResult<Vec<u8>> {
        let anim = self.decode(bytes)?;
        let frames = anim
            .frames()
            .iter()
            .map(|f| scale(&self.pool, f, opts.scale))
            .collect::<GifloomResult<Vec<_>>>()?;
        encode_gif(&frames, &opts.encode)
    }
}

/// Prefix a per-source failure with its index, keeping the error kind.
fn with_source_index(err: GifloomError, index: usize) -> GifloomError {
    match err {
        GifloomError::Surface(m) => GifloomError::Surface(format!("source {index}: {m}")),
        GifloomError::Input(m) => GifloomError::Input(format!("source {index}: {m}")),
        GifloomError::Decode(m) => GifloomError::Decode(format!("source {index}: {m}")),
        GifloomError::Encode(m) => GifloomError::Encode(format!("source {index}: {m}")),
        GifloomError::Other(e) => GifloomError::Other(e.context(format!("source {index}"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/transcoder.rs"]
mod tests;
