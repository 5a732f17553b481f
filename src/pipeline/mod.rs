//! Multi-stage flows built from decode, resample and encode.

/// GIF to zip-of-stills export.
pub mod export;
/// Multi-source merge onto one canvas and timeline.
pub mod merge;
/// Still images to an equally timed frame sequence.
pub mod sequence;

pub use export::{ExportOptions, ExportOutput, export_animation};
pub use merge::{MergeOptions, MergeOutput, merge_animations, merge_canvas_size};
pub use sequence::{SequenceOptions, images_to_frames};
