//! GIF decode path: bitstream adapter plus the frame compositor.

/// Disposal state machine and canvas compositing.
pub mod compositor;
/// `gif` crate adapter producing raw sub-frames.
pub mod parse;

use crate::foundation::core::DecodedAnimation;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::raster::surface_pool::SurfacePool;

pub use compositor::{Disposal, DisposalTiming, composite};
pub use parse::{ParsedGif, SubFrame, parse_gif};

/// Decode GIF bytes into full-canvas RGBA frames.
pub fn decode_gif(
    pool: &SurfacePool,
    bytes: &[u8],
    timing: DisposalTiming,
) -> GifloomResult<DecodedAnimation> {
    let parsed = parse_gif(bytes)?;
    if parsed.frames.is_empty() {
        return Err(GifloomError::decode("gif contains no frames"));
    }
    composite(pool, &parsed, timing)
}
