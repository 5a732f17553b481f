use crate::encode::palette::{ColorFormat, QuantizedPalette, quantize};
use crate::foundation::core::RasterFrame;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::delay_ms_for_fps;
use std::borrow::Cow;

/// MIME type of the produced byte stream.
pub const GIF_MIME: &str = "image/gif";

/// Options for [`encode_gif`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Frame rate used only for frames that carry no delay of their own.
    pub fps: f64,
    /// Loop forever (`true`) or play once (`false`).
    pub loop_forever: bool,
    /// Palette budget, clamped to `2..=256`.
    pub max_colors: u16,
    /// Quantize all frames together into one global color table.
    pub use_global_palette: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            fps: 10.0,
            loop_forever: true,
            max_colors: 256,
            use_global_palette: false,
        }
    }
}

impl EncodeOptions {
    pub(crate) fn validate(&self) -> GifloomResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(GifloomError::input(format!(
                "fps must be a positive finite number, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

/// Loop metadata carried by the first frame of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCount {
    /// NETSCAPE loop count 0.
    Infinite,
    /// No loop extension is written; viewers play the animation once.
    PlayOnce,
}

/// Which color table a frame indexes into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteRef {
    /// The sequence's global table.
    Global,
    /// A per-frame local table.
    Local(Vec<[u8; 4]>),
}

/// GIF disposal written into a frame's graphic control extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDispose {
    /// Leave the frame in place (combine).
    Keep,
    /// Restore the frame area to background.
    Background,
}

/// A palette-indexed frame ready to be written.
#[derive(Clone, Debug)]
pub struct IndexedFrame {
    /// One palette index per pixel.
    pub indices: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Effective delay in milliseconds.
    pub delay_ms: u32,
    /// Color table used by this frame.
    pub palette: PaletteRef,
    /// Index treated as transparent, if any.
    pub transparent_index: Option<u8>,
    /// Disposal written for this frame.
    pub dispose: FrameDispose,
    /// Set on the first frame only.
    pub loop_count: Option<LoopCount>,
}

/// An indexed sequence plus its optional global color table.
#[derive(Clone, Debug)]
pub struct IndexedSequence {
    /// Logical screen width.
    pub width: u32,
    /// Logical screen height.
    pub height: u32,
    /// Global color table, present only when a global palette was requested.
    pub global_palette: Option<Vec<[u8; 4]>>,
    /// Frames in output order.
    pub frames: Vec<IndexedFrame>,
}

/// Quantize RGBA frames and attach per-frame GIF metadata.
pub fn index_frames(
    frames: &[RasterFrame],
    opts: &EncodeOptions,
) -> GifloomResult<IndexedSequence> {
    let Some(first) = frames.first() else {
        return Err(GifloomError::input("at least one frame is required"));
    };
    opts.validate()?;
    let (width, height) = (first.width, first.height);
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(GifloomError::input(format!(
            "{width}x{height} exceeds the gif limit of 65535 per side"
        )));
    }
    for (i, f) in frames.iter().enumerate() {
        f.ensure_consistent()?;
        if f.width != width || f.height != height {
            return Err(GifloomError::input(format!(
                "frame {i} is {}x{}, expected {width}x{height}",
                f.width, f.height
            )));
        }
    }

    let format = ColorFormat::detect(frames.iter().map(|f| f.pixels.as_slice()));
    let max_colors = usize::from(opts.max_colors);
    let fallback_delay = delay_ms_for_fps(opts.fps);

    let global = if opts.use_global_palette {
        let samples = frames
            .iter()
            .map(|f| f.pixels.as_slice())
            .collect::<Vec<_>>()
            .concat();
        Some(quantize(&samples, max_colors, format)?)
    } else {
        None
    };

    let mut out = Vec::with_capacity(frames.len());
    for (i, f) in frames.iter().enumerate() {
        let local;
        let (palette, palette_ref): (&QuantizedPalette, PaletteRef) = match &global {
            Some(g) => (g, PaletteRef::Global),
            None => {
                local = quantize(&f.pixels, max_colors, format)?;
                (&local, PaletteRef::Local(local.colors().to_vec()))
            }
        };
        let transparent_index = palette.transparent_index();

        out.push(IndexedFrame {
            indices: palette.apply(&f.pixels),
            width,
            height,
            delay_ms: if f.delay_ms > 0 {
                f.delay_ms
            } else {
                fallback_delay
            },
            palette: palette_ref,
            transparent_index,
            dispose: if transparent_index.is_some() {
                FrameDispose::Background
            } else {
                FrameDispose::Keep
            },
            loop_count: (i == 0).then_some(if opts.loop_forever {
                LoopCount::Infinite
            } else {
                LoopCount::PlayOnce
            }),
        });
    }

    tracing::debug!(
        frames = out.len(),
        width,
        height,
        ?format,
        global = global.as_ref().map(|g| g.len()),
        "indexed frames"
    );
    Ok(IndexedSequence {
        width,
        height,
        global_palette: global.map(|g| g.colors().to_vec()),
        frames: out,
    })
}

fn rgb_table(colors: &[[u8; 4]]) -> Vec<u8> {
    colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect()
}

/// GIF delays are centiseconds; round and clamp into `u16`.
fn delay_cs(delay_ms: u32) -> u16 {
    (delay_ms.saturating_add(5) / 10).min(u32::from(u16::MAX)) as u16
}

/// Serialize an indexed sequence as a GIF89a byte stream.
pub fn write_gif(seq: &IndexedSequence) -> GifloomResult<Vec<u8>> {
    let w = u16::try_from(seq.width)
        .map_err(|_| GifloomError::input(format!("gif width {} exceeds 65535", seq.width)))?;
    let h = u16::try_from(seq.height)
        .map_err(|_| GifloomError::input(format!("gif height {} exceeds 65535", seq.height)))?;
    let global = seq.global_palette.as_deref().map(rgb_table).unwrap_or_default();

    let mut out = Vec::new();
    let mut enc = gif::Encoder::new(&mut out, w, h, &global)
        .map_err(|e| GifloomError::encode(format!("gif header: {e}")))?;

    for (i, f) in seq.frames.iter().enumerate() {
        if f.loop_count == Some(LoopCount::Infinite) {
            enc.set_repeat(gif::Repeat::Infinite)
                .map_err(|e| GifloomError::encode(format!("gif loop extension: {e}")))?;
        }
        let frame = gif::Frame {
            width: w,
            height: h,
            delay: delay_cs(f.delay_ms),
            dispose: match f.dispose {
                FrameDispose::Keep => gif::DisposalMethod::Keep,
                FrameDispose::Background => gif::DisposalMethod::Background,
            },
            transparent: f.transparent_index,
            palette: match &f.palette {
                PaletteRef::Global => None,
                PaletteRef::Local(colors) => Some(rgb_table(colors)),
            },
            buffer: Cow::Borrowed(f.indices.as_slice()),
            ..Default::default()
        };
        enc.write_frame(&frame)
            .map_err(|e| GifloomError::encode(format!("gif frame {i}: {e}")))?;
    }

    enc.into_inner()
        .map_err(|e| GifloomError::encode(format!("gif trailer: {e}")))?;
    Ok(out)
}

/// Encode RGBA frames into an animated GIF byte stream ([`GIF_MIME`]).
pub fn encode_gif(frames: &[RasterFrame], opts: &EncodeOptions) -> GifloomResult<Vec<u8>> {
    let seq = index_frames(frames, opts)?;
    let bytes = write_gif(&seq)?;
    tracing::debug!(bytes = bytes.len(), "encoded gif");
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/indexed.rs"]
mod tests;
