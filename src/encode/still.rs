use crate::foundation::core::RasterFrame;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::foundation::math::flatten_on_black;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::str::FromStr;

/// Lowest quality handed to lossy encoders.
const MIN_QUALITY: f32 = 0.1;

/// Still-image output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StillFormat {
    /// Lossless PNG with alpha. Quality is ignored.
    Png,
    /// JPEG, alpha flattened onto black.
    Jpeg,
    /// Same encoder as [`StillFormat::Jpeg`], written with a `.jpg` extension.
    Jpg,
    /// Lossless WebP with alpha.
    Webp,
}

impl StillFormat {
    /// File extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// MIME type of encoded output.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg | Self::Jpg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl FromStr for StillFormat {
    type Err = GifloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            "jpg" => Ok(Self::Jpg),
            "webp" => Ok(Self::Webp),
            other => Err(GifloomError::input(format!(
                "unsupported still format '{other}' (expected png, jpeg, jpg or webp)"
            ))),
        }
    }
}

/// Map a normalized quality (`0.0..=1.0`, out-of-range and NaN clamped) to a JPEG quality.
pub(crate) fn jpeg_quality(quality: f32) -> u8 {
    let q = if quality.is_nan() {
        1.0
    } else {
        quality.clamp(MIN_QUALITY, 1.0)
    };
    ((q * 100.0).round() as u8).clamp(1, 100)
}

/// Encode one frame as a still image.
pub fn encode_still(
    frame: &RasterFrame,
    format: StillFormat,
    quality: f32,
) -> GifloomResult<Vec<u8>> {
    frame.ensure_consistent()?;
    let (w, h) = (frame.width, frame.height);
    let mut out = Vec::new();
    let res = match format {
        StillFormat::Png => {
            PngEncoder::new(&mut out).write_image(&frame.pixels, w, h, ExtendedColorType::Rgba8)
        }
        StillFormat::Jpeg | StillFormat::Jpg => {
            let rgb: Vec<u8> = frame
                .pixels
                .chunks_exact(4)
                .flat_map(|px| flatten_on_black([px[0], px[1], px[2], px[3]]))
                .collect();
            JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality)).write_image(
                &rgb,
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        StillFormat::Webp => WebPEncoder::new_lossless(&mut out).write_image(
            &frame.pixels,
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
    };
    res.map_err(|e| GifloomError::encode(format!("{} encode: {e}", format.extension())))?;
    Ok(out)
}

/// Load a still image (any format `image` was built with) as an RGBA frame.
pub fn load_still(bytes: &[u8], delay_ms: u32) -> GifloomResult<RasterFrame> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| GifloomError::decode(format!("failed to load image: {e}")))?;
    Ok(RasterFrame::from_image(img.to_rgba8(), delay_ms))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
