use super::counts::BlockCount;
use super::snapshot::PaletteSnapshot;
use crate::palette::PaletteEntry;

/// Diagnostic data gathered while quantizing. Plain data, never formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Per-pixel error-diffusion strength (row-major), when natural mode ran.
    pub strength_mask: Option<Vec<f32>>,
    /// Pixels where the guided cost had no finite candidate and the plain
    /// sRGB match was used instead.
    pub fallback_pixels: usize,
}

/// A width x height grid of indices into a frozen palette snapshot.
///
/// # Example
///
/// ```
/// use mapart_core::color::Rgb;
/// use mapart_core::output::{PaletteSnapshot, QuantizedRaster};
/// use mapart_core::palette::PaletteEntry;
///
/// let snapshot = PaletteSnapshot::new(vec![
///     PaletteEntry::new(Rgb::new(0, 0, 0), "minecraft:black_wool", "Black Wool", "wool"),
///     PaletteEntry::new(Rgb::new(255, 255, 255), "minecraft:white_wool", "White Wool", "wool"),
/// ]);
/// let raster = QuantizedRaster::new(vec![0, 1, 1, 0], 2, 2, snapshot);
///
/// assert_eq!(raster.entry_at(1, 0).block_id, "minecraft:white_wool");
/// assert_eq!(raster.to_rgba().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone)]
pub struct QuantizedRaster {
    indices: Vec<u16>,
    width: usize,
    height: usize,
    snapshot: PaletteSnapshot,
    diagnostics: Diagnostics,
}

impl QuantizedRaster {
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index is within the snapshot.
    pub fn new(indices: Vec<u16>, width: usize, height: usize, snapshot: PaletteSnapshot) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({width}x{height})",
            indices.len(),
        );
        debug_assert!(indices.iter().all(|&i| (i as usize) < snapshot.len()));
        Self {
            indices,
            width,
            height,
            snapshot,
            diagnostics: Diagnostics::default(),
        }
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn snapshot(&self) -> &PaletteSnapshot {
        &self.snapshot
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Entry at a pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the raster.
    #[inline]
    pub fn entry_at(&self, x: usize, y: usize) -> &PaletteEntry {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        &self.snapshot[self.indices[y * self.width + x] as usize]
    }

    /// RGBA bytes with alpha forced to 255.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.indices.len() * 4);
        for &idx in &self.indices {
            let c = self.snapshot[idx as usize].rgb;
            out.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        out
    }

    /// Per-entry usage, in snapshot order, omitting unused entries.
    pub fn block_counts(&self) -> Vec<BlockCount> {
        let mut counts = vec![0usize; self.snapshot.len()];
        for &idx in &self.indices {
            counts[idx as usize] += 1;
        }
        self.snapshot
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(entry, count)| BlockCount {
                block_id: entry.block_id.clone(),
                label: entry.label().to_string(),
                rgb: entry.rgb,
                count,
            })
            .collect()
    }
}
