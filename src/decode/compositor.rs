//! Turns GIF sub-frames into full-canvas RGBA snapshots.
//!
//! The canvas is one pooled surface held for the whole file. Disposal handling is a small
//! transition table: a disposal mode and a phase map to one [`CanvasAction`], and the compositor
//! loop only ever executes actions.

use crate::decode::parse::{ParsedGif, SubFrame};
use crate::foundation::core::{DecodedAnimation, PixelRect, RasterFrame};
use crate::foundation::error::GifloomResult;
use crate::raster::ops::{blit_over, clear_rect, restore};
use crate::raster::surface_pool::{PooledSurface, SurfacePool};

/// Per-frame disposal mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposal {
    /// No disposal specified.
    #[default]
    None,
    /// Leave the frame in place and draw the next one on top.
    Combine,
    /// Clear the frame's rectangle to transparent.
    RestoreBackground,
    /// Put the canvas back to an earlier snapshot.
    RestorePrevious,
}

/// When a frame's disposal mode is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalTiming {
    /// A frame's own disposal runs both right before and right after that frame is drawn, and
    /// restore-previous restores the last snapshot taken after a none/combine frame.
    #[default]
    AsAuthored,
    /// GIF89a: a frame's disposal runs after it is shown and before the next frame is drawn, and
    /// restore-previous restores the canvas as it was before the disposing frame was drawn.
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    BeforeDraw,
    AfterDraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CanvasAction {
    Keep,
    ClearRect,
    RestorePrevious,
    /// Record the snapshot just taken as the restore point.
    Remember,
}

fn as_authored_action(disposal: Disposal, phase: Phase) -> CanvasAction {
    match (disposal, phase) {
        (Disposal::RestoreBackground, _) => CanvasAction::ClearRect,
        (Disposal::RestorePrevious, _) => CanvasAction::RestorePrevious,
        (Disposal::None | Disposal::Combine, Phase::BeforeDraw) => CanvasAction::Keep,
        (Disposal::None | Disposal::Combine, Phase::AfterDraw) => CanvasAction::Remember,
    }
}

fn deferred_action(disposal: Disposal, phase: Phase) -> CanvasAction {
    match (disposal, phase) {
        // The restore point for a restore-previous frame is the canvas before it draws.
        (Disposal::RestorePrevious, Phase::BeforeDraw) => CanvasAction::Remember,
        (Disposal::RestorePrevious, Phase::AfterDraw) => CanvasAction::RestorePrevious,
        (Disposal::RestoreBackground, Phase::AfterDraw) => CanvasAction::ClearRect,
        (_, _) => CanvasAction::Keep,
    }
}

struct Canvas<'p> {
    surface: PooledSurface<'p>,
    previous: Option<Vec<u8>>,
}

impl Canvas<'_> {
    fn apply(
        &mut self,
        action: CanvasAction,
        rect: PixelRect,
        snapshot: Option<&[u8]>,
    ) -> GifloomResult<()> {
        match action {
            CanvasAction::Keep => {}
            CanvasAction::ClearRect => clear_rect(&mut self.surface, rect),
            CanvasAction::RestorePrevious => {
                if let Some(prev) = self.previous.as_deref() {
                    restore(&mut self.surface, prev)?;
                }
            }
            CanvasAction::Remember => {
                self.previous = Some(match snapshot {
                    Some(s) => s.to_vec(),
                    None => self.surface.snapshot(),
                });
            }
        }
        Ok(())
    }
}

/// Composite parsed sub-frames into a [`DecodedAnimation`] of full-canvas frames.
///
/// Any failure aborts the whole file; no partial animation is returned.
pub fn composite(
    pool: &SurfacePool,
    parsed: &ParsedGif,
    timing: DisposalTiming,
) -> GifloomResult<DecodedAnimation> {
    let mut canvas = Canvas {
        surface: pool.acquire(parsed.width, parsed.height)?,
        previous: None,
    };
    let table: fn(Disposal, Phase) -> CanvasAction = match timing {
        DisposalTiming::AsAuthored => as_authored_action,
        DisposalTiming::Deferred => deferred_action,
    };

    let mut frames = Vec::with_capacity(parsed.frames.len());
    for sub in &parsed.frames {
        frames.push(composite_one(&mut canvas, sub, table)?);
    }

    tracing::debug!(
        width = parsed.width,
        height = parsed.height,
        frames = frames.len(),
        ?timing,
        "composited gif"
    );
    DecodedAnimation::new(parsed.width, parsed.height, frames)
}

fn composite_one(
    canvas: &mut Canvas<'_>,
    sub: &SubFrame,
    table: fn(Disposal, Phase) -> CanvasAction,
) -> GifloomResult<RasterFrame> {
    canvas.apply(table(sub.disposal, Phase::BeforeDraw), sub.rect, None)?;
    blit_over(&mut canvas.surface, sub.rect, &sub.pixels)?;

    let snapshot = canvas.surface.snapshot();
    canvas.apply(
        table(sub.disposal, Phase::AfterDraw),
        sub.rect,
        Some(&snapshot),
    )?;

    let (w, h) = canvas.surface.dimensions();
    RasterFrame::new(w, h, snapshot, sub.delay_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/compositor.rs"]
mod tests;
