//! gifloom decodes animated GIFs into fully composited RGBA frames and turns frame sequences back
//! into palette-indexed GIFs or zip archives of still images.
//!
//! The public API is session-oriented:
//!
//! - Create a [`Transcoder`] (it owns the [`SurfacePool`] every stage draws from)
//! - [`Transcoder::decode`] GIF bytes into a [`DecodedAnimation`]
//! - [`Transcoder::encode`], [`Transcoder::merge`] or [`Transcoder::export_frames`] the result
//!
//! The free functions at the crate root run a single operation on a throwaway default session.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// GIF decoding and frame compositing.
pub mod decode;
/// Palette quantization, GIF writing and still-image codecs.
pub mod encode;
/// Merge, still-sequence and export flows.
pub mod pipeline;
/// Pooled raster surfaces and resampling.
pub mod raster;
/// Pool-owning transcoding session.
pub mod session;

pub use crate::foundation::core::{DecodedAnimation, PixelRect, RasterFrame};
pub use crate::foundation::error::{GifloomError, GifloomResult};

pub use crate::decode::{Disposal, DisposalTiming};
pub use crate::encode::indexed::{EncodeOptions, GIF_MIME};
pub use crate::encode::palette::{ColorFormat, QuantizedPalette, quantize};
pub use crate::encode::still::StillFormat;
pub use crate::pipeline::export::{ExportOptions, ExportOutput};
pub use crate::pipeline::merge::{MergeOptions, MergeOutput};
pub use crate::pipeline::sequence::SequenceOptions;
pub use crate::raster::surface_pool::{
    PooledSurface, SurfacePool, SurfacePoolOpts, SurfacePoolStats,
};
pub use crate::session::transcoder::{RecodeOptions, Transcoder, TranscoderOpts};

/// Decode GIF bytes with default session options.
pub fn decode(bytes: &[u8]) -> GifloomResult<DecodedAnimation> {
    Transcoder::default().decode(bytes)
}

/// Encode RGBA frames into animated GIF bytes.
pub fn encode(frames: &[RasterFrame], opts: &EncodeOptions) -> GifloomResult<Vec<u8>> {
    Transcoder::default().encode(frames, opts)
}

/// Decode and merge GIF sources into one GIF.
pub fn merge<B: AsRef<[u8]>>(sources: &[B], opts: &MergeOptions) -> GifloomResult<MergeOutput> {
    Transcoder::default().merge(sources, opts)
}

/// Turn still images into an equally timed frame sequence.
pub fn images_to_frames<B: AsRef<[u8]>>(
    images: &[B],
    opts: &SequenceOptions,
) -> GifloomResult<Vec<RasterFrame>> {
    Transcoder::default().images_to_frames(images, opts)
}

/// Export every frame of an animation into a zip of still images.
pub fn export_frames(
    anim: &DecodedAnimation,
    opts: &ExportOptions,
) -> GifloomResult<ExportOutput> {
    Transcoder::default().export_frames(anim, opts)
}
