use crate::encode::still::{StillFormat, encode_still};
use crate::foundation::core::DecodedAnimation;
use crate::foundation::error::{GifloomError, GifloomResult};
use crate::raster::resample::{scale, validate_scale};
use crate::raster::surface_pool::SurfacePool;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Options for exporting an animation as a zip of still images.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Still-image format of every entry.
    pub format: StillFormat,
    /// Normalized quality in `0.0..=1.0`; only JPEG uses it.
    pub quality: f32,
    /// Scale applied to each frame before encoding.
    pub scale: f64,
    /// Entry name prefix: `<base_name>-frame-NNN.<ext>`.
    pub base_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: StillFormat::Png,
            quality: 0.92,
            scale: 1.0,
            base_name: "frames".to_string(),
        }
    }
}

/// A zip archive of encoded frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutput {
    /// Zip archive bytes.
    pub archive: Vec<u8>,
    /// Number of entries written.
    pub frame_count: usize,
}

/// Archive entry name for the 1-based frame `number`.
pub(crate) fn entry_name(base_name: &str, number: usize, format: StillFormat) -> String {
    format!("{base_name}-frame-{number:03}.{}", format.extension())
}

/// Scale, encode and archive every frame in order. One failed frame fails the export.
pub fn export_animation(
    pool: &SurfacePool,
    anim: &DecodedAnimation,
    opts: &ExportOptions,
) -> GifloomResult<ExportOutput> {
    if anim.frame_count() == 0 {
        return Err(GifloomError::input("at least one frame is required"));
    }
    let base_name = opts.base_name.trim();
    if base_name.is_empty() {
        return Err(GifloomError::input("base name must not be empty"));
    }
    validate_scale(opts.scale)?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for (i, frame) in anim.frames().iter().enumerate() {
        let scaled = scale(pool, frame, opts.scale)?;
        let bytes = encode_still(&scaled, opts.format, opts.quality)?;
        let name = entry_name(base_name, i + 1, opts.format);
        let entry_opts =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file(name.as_str(), entry_opts)
            .map_err(|e| GifloomError::encode(format!("zip entry {name}: {e}")))?;
        zip.write_all(&bytes)
            .map_err(|e| GifloomError::encode(format!("zip entry {name}: {e}")))?;
    }

    let archive = zip
        .finish()
        .map_err(|e| GifloomError::encode(format!("zip finish: {e}")))?
        .into_inner();

    tracing::debug!(
        frames = anim.frame_count(),
        format = opts.format.extension(),
        bytes = archive.len(),
        "exported frames"
    );
    Ok(ExportOutput {
        archive,
        frame_count: anim.frame_count(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/export.rs"]
mod tests;
