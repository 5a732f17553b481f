use crate::foundation::error::{GifloomError, GifloomResult};

/// Integer pixel rectangle (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Rectangle covering a whole `width x height` surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Intersect with a `width x height` surface. Returns `None` when nothing is left.
    pub fn clip_to(self, width: u32, height: u32) -> Option<Self> {
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);
        if self.x >= x1 || self.y >= y1 {
            return None;
        }
        Some(Self {
            x: self.x,
            y: self.y,
            width: x1 - self.x,
            height: y1 - self.y,
        })
    }
}

/// A full RGBA8 frame (straight alpha, tightly packed, row-major).
///
/// Invariant: `pixels.len() == width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub pixels: Vec<u8>,
    /// Display time in milliseconds. `0` means "unspecified" and lets encoders fall back to fps.
    pub delay_ms: u32,
}

impl RasterFrame {
    /// Create a validated frame.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, delay_ms: u32) -> GifloomResult<Self> {
        let expected = rgba_len(width, height)?;
        if pixels.len() != expected {
            return Err(GifloomError::input(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} rgba8",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            delay_ms,
        })
    }

    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32, delay_ms: u32) -> GifloomResult<Self> {
        let len = rgba_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
            delay_ms,
        })
    }

    /// Wrap an `image` buffer without copying.
    pub fn from_image(img: image::RgbaImage, delay_ms: u32) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            delay_ms,
        }
    }

    /// Convert into an `image` buffer without copying.
    pub fn into_image(self) -> GifloomResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.pixels)
            .ok_or_else(|| GifloomError::input(format!("frame buffer does not match {w}x{h}")))
    }

    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> GifloomResult<image::RgbaImage> {
        self.clone().into_image()
    }

    /// Return `true` when any pixel has alpha below 255.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] < 255)
    }

    pub(crate) fn ensure_consistent(&self) -> GifloomResult<()> {
        let expected = rgba_len(self.width, self.height)?;
        if self.pixels.len() != expected {
            return Err(GifloomError::input(format!(
                "frame buffer is {} bytes, expected {expected} for {}x{} rgba8",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// A decoded animation: full-canvas frames in display order.
///
/// Immutable once built; every frame has the animation's dimensions.
#[derive(Clone, Debug)]
pub struct DecodedAnimation {
    width: u32,
    height: u32,
    frames: Vec<RasterFrame>,
    total_duration_ms: u64,
}

impl DecodedAnimation {
    /// Build an animation from full-canvas frames.
    pub fn new(width: u32, height: u32, frames: Vec<RasterFrame>) -> GifloomResult<Self> {
        for (i, f) in frames.iter().enumerate() {
            f.ensure_consistent()?;
            if f.width != width || f.height != height {
                return Err(GifloomError::input(format!(
                    "frame {i} is {}x{}, animation canvas is {width}x{height}",
                    f.width, f.height
                )));
            }
        }
        let total_duration_ms = frames.iter().map(|f| u64::from(f.delay_ms)).sum();
        Ok(Self {
            width,
            height,
            frames,
            total_duration_ms,
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frames in display order.
    pub fn frames(&self) -> &[RasterFrame] {
        &self.frames
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Sum of all frame delays.
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }
}

pub(crate) fn rgba_len(width: u32, height: u32) -> GifloomResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GifloomError::input(format!("{width}x{height} rgba8 buffer size overflow")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
