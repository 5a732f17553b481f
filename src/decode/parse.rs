use crate::decode::compositor::Disposal;
use crate::foundation::core::PixelRect;
use crate::foundation::error::{GifloomError, GifloomResult};
use std::io::Cursor;

/// One raw GIF sub-frame: an RGBA patch plus its placement and timing.
#[derive(Clone, Debug)]
pub struct SubFrame {
    /// Where the patch lands on the logical screen.
    pub rect: PixelRect,
    /// `rect.width * rect.height` RGBA8 pixels; transparent-index pixels carry alpha 0.
    pub pixels: Vec<u8>,
    /// Disposal mode authored for this sub-frame.
    pub disposal: Disposal,
    /// Delay in milliseconds.
    pub delay_ms: u32,
}

/// A GIF split into sub-frames, before compositing.
#[derive(Clone, Debug)]
pub struct ParsedGif {
    /// Logical screen width.
    pub width: u32,
    /// Logical screen height.
    pub height: u32,
    /// Sub-frames in stream order.
    pub frames: Vec<SubFrame>,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(m: gif::DisposalMethod) -> Self {
        match m {
            gif::DisposalMethod::Any => Disposal::None,
            gif::DisposalMethod::Keep => Disposal::Combine,
            gif::DisposalMethod::Background => Disposal::RestoreBackground,
            gif::DisposalMethod::Previous => Disposal::RestorePrevious,
        }
    }
}

/// Parse GIF bytes into sub-frames. LZW decoding and palette expansion are done by `gif`.
pub fn parse_gif(bytes: &[u8]) -> GifloomResult<ParsedGif> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = opts
        .read_info(Cursor::new(bytes))
        .map_err(|e| GifloomError::decode(format!("failed to read gif header: {e}")))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());

    let mut frames = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| GifloomError::decode(format!("gif frame {} decode: {e}", frames.len())))?
    {
        frames.push(SubFrame {
            rect: PixelRect {
                x: u32::from(frame.left),
                y: u32::from(frame.top),
                width: u32::from(frame.width),
                height: u32::from(frame.height),
            },
            pixels: frame.buffer.to_vec(),
            disposal: frame.dispose.into(),
            // GIF delays are centiseconds.
            delay_ms: u32::from(frame.delay) * 10,
        });
    }

    tracing::debug!(width, height, frames = frames.len(), "parsed gif");
    Ok(ParsedGif {
        width,
        height,
        frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/decode/parse.rs"]
mod tests;
