//! Encode path: palette quantization, indexed GIF writing and still-image codecs.

/// Animated GIF writer on top of the `gif` crate.
pub mod indexed;
/// Color-budgeted palette construction.
pub mod palette;
/// PNG / JPEG / WebP single-frame codecs.
pub mod still;

pub use indexed::{
    EncodeOptions, FrameDispose, GIF_MIME, IndexedFrame, IndexedSequence, LoopCount, PaletteRef,
    encode_gif, index_frames, write_gif,
};
pub use palette::{ALPHA_CUTOFF, ColorFormat, QuantizedPalette, quantize};
pub use still::{StillFormat, encode_still, load_still};
