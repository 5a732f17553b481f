use crate::foundation::error::{GifloomError, GifloomResult};
use std::collections::HashMap;

/// NeuQuant sampling factor (1 = every pixel, 30 = fastest).
const SAMPLE_FACTOR: i32 = 10;

/// NeuQuant's learning schedule needs at least one sample per cycle (100 cycles).
const MIN_LEARN_PIXELS: usize = 100 * SAMPLE_FACTOR as usize;

/// Alpha at or above this value is treated as opaque; below it, fully transparent.
pub const ALPHA_CUTOFF: u8 = 128;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
const FILLER: [u8; 4] = [0, 0, 0, 255];

/// Quantization color format, chosen once per encode job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    /// Alpha is ignored; every entry is opaque.
    Opaque,
    /// Alpha is kept as GIF 1-bit transparency; transparent pixels share one alpha-0 entry.
    AlphaAware,
}

impl ColorFormat {
    /// Pick the format for a set of RGBA buffers: alpha-aware if any pixel is not fully opaque.
    pub fn detect<'a>(buffers: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let translucent = buffers
            .into_iter()
            .any(|b| b.chunks_exact(4).any(|px| px[3] < 255));
        if translucent {
            Self::AlphaAware
        } else {
            Self::Opaque
        }
    }

    fn canonical(self, px: &[u8]) -> [u8; 4] {
        match self {
            Self::Opaque => [px[0], px[1], px[2], 255],
            Self::AlphaAware if px[3] < ALPHA_CUTOFF => TRANSPARENT,
            Self::AlphaAware => [px[0], px[1], px[2], 255],
        }
    }
}

enum Mapper {
    Exact(HashMap<[u8; 4], u8>),
    Neural(Box<color_quant::NeuQuant>),
    /// Every opaque pixel maps to entry 0.
    Single,
}

/// A palette of at most 256 RGBA entries plus the pixel → index mapping that produced it.
pub struct QuantizedPalette {
    format: ColorFormat,
    colors: Vec<[u8; 4]>,
    transparent_index: Option<u8>,
    mapper: Mapper,
}

impl std::fmt::Debug for QuantizedPalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantizedPalette")
            .field("format", &self.format)
            .field("len", &self.colors.len())
            .field("transparent_index", &self.transparent_index)
            .finish()
    }
}

impl QuantizedPalette {
    /// Palette entries in index order.
    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Return `true` when the palette has no entries (never the case once built).
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Format the palette was built with.
    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// First entry (in index order) whose alpha is 0.
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Palette index for one RGBA pixel.
    pub fn index_of(&self, px: &[u8]) -> u8 {
        let c = self.format.canonical(px);
        if c[3] == 0
            && let Some(t) = self.transparent_index
        {
            return t;
        }
        match &self.mapper {
            Mapper::Exact(map) => match map.get(&c) {
                Some(&i) => i,
                None => nearest_opaque(&self.colors, c),
            },
            Mapper::Neural(nq) => nq.index_of(&c) as u8,
            Mapper::Single => 0,
        }
    }

    /// Map a whole RGBA buffer to palette indices, one per pixel.
    pub fn apply(&self, pixels: &[u8]) -> Vec<u8> {
        pixels.chunks_exact(4).map(|px| self.index_of(px)).collect()
    }
}

/// Build a palette of at most `max_colors` (clamped to `2..=256`) entries for an RGBA buffer.
///
/// When the buffer has no more distinct colors than the budget the palette is exact (entries in
/// first-seen order); otherwise opaque colors are reduced with NeuQuant and, for alpha-aware
/// input containing transparency, one alpha-0 entry is reserved at the end.
pub fn quantize(
    pixels: &[u8],
    max_colors: usize,
    format: ColorFormat,
) -> GifloomResult<QuantizedPalette> {
    if !pixels.len().is_multiple_of(4) {
        return Err(GifloomError::input(
            "quantize expects an rgba8 buffer (length multiple of 4)",
        ));
    }
    let budget = max_colors.clamp(2, 256);

    let (mut colors, mapper) = match exact_colors(pixels, budget, format) {
        Some((colors, map)) => (colors, Mapper::Exact(map)),
        None => reduce(pixels, budget, format),
    };
    while colors.len() < 2 {
        colors.push(FILLER);
    }
    debug_assert!(colors.len() <= budget);

    let transparent_index = colors.iter().position(|c| c[3] == 0).map(|i| i as u8);
    Ok(QuantizedPalette {
        format,
        colors,
        transparent_index,
        mapper,
    })
}

type ExactPalette = (Vec<[u8; 4]>, HashMap<[u8; 4], u8>);

fn exact_colors(pixels: &[u8], budget: usize, format: ColorFormat) -> Option<ExactPalette> {
    let mut colors = Vec::new();
    let mut map = HashMap::new();
    for px in pixels.chunks_exact(4) {
        let c = format.canonical(px);
        if map.contains_key(&c) {
            continue;
        }
        if colors.len() == budget {
            return None;
        }
        map.insert(c, colors.len() as u8);
        colors.push(c);
    }
    Some((colors, map))
}

fn reduce(pixels: &[u8], budget: usize, format: ColorFormat) -> (Vec<[u8; 4]>, Mapper) {
    let mut opaque = Vec::with_capacity(pixels.len());
    let mut has_transparent = false;
    for px in pixels.chunks_exact(4) {
        let c = format.canonical(px);
        if c[3] == 0 {
            has_transparent = true;
        } else {
            opaque.extend_from_slice(&c);
        }
    }

    let opaque_budget = budget - usize::from(has_transparent);
    let (mut colors, mapper) = if opaque_budget <= 1 {
        (vec![mean_color(&opaque)], Mapper::Single)
    } else {
        let samples = learn_samples(opaque);
        let nq = color_quant::NeuQuant::new(SAMPLE_FACTOR, opaque_budget, &samples);
        let colors = nq
            .color_map_rgba()
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect();
        (colors, Mapper::Neural(Box::new(nq)))
    };

    if has_transparent {
        colors.push(TRANSPARENT);
    }
    (colors, mapper)
}

fn learn_samples(opaque: Vec<u8>) -> Vec<u8> {
    let n = opaque.len() / 4;
    if n == 0 || n >= MIN_LEARN_PIXELS {
        return opaque;
    }
    opaque.repeat(MIN_LEARN_PIXELS.div_ceil(n))
}

fn mean_color(opaque: &[u8]) -> [u8; 4] {
    let n = (opaque.len() / 4) as u64;
    if n == 0 {
        return FILLER;
    }
    let mut sum = [0u64; 3];
    for px in opaque.chunks_exact(4) {
        for i in 0..3 {
            sum[i] += u64::from(px[i]);
        }
    }
    [
        (sum[0] / n) as u8,
        (sum[1] / n) as u8,
        (sum[2] / n) as u8,
        255,
    ]
}

fn nearest_opaque(colors: &[[u8; 4]], c: [u8; 4]) -> u8 {
    colors
        .iter()
        .enumerate()
        .filter(|(_, e)| e[3] != 0)
        .min_by_key(|(_, e)| rgb_distance_sq(**e, c))
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}

fn rgb_distance_sq(a: [u8; 4], b: [u8; 4]) -> u32 {
    (0..3)
        .map(|i| {
            let d = i32::from(a[i]) - i32::from(b[i]);
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/palette.rs"]
mod tests;
