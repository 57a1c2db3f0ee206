use std::collections::HashMap;

use super::ident::{canonicalize, AIR};
use super::StructureError;
use crate::color::Rgb;
use crate::output::{PaletteSnapshot, QuantizedRaster};

/// A flat grid of block identifiers, row-major by `z * width + x`.
///
/// Every cell holds either an allow-listed identifier or [`AIR`] for a
/// pixel that could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureModel {
    width: usize,
    height: usize,
    cells: Vec<String>,
    unmapped: usize,
}

fn check_size(width: usize, height: usize, actual: usize) -> Result<(), StructureError> {
    if width == 0 || height == 0 {
        return Err(StructureError::EmptyModel { width, height });
    }
    if actual != width * height {
        return Err(StructureError::CellCountMismatch {
            expected: width * height,
            actual,
        });
    }
    Ok(())
}

/// Canonicalize each distinct id once.
fn canonical_cells<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut memo: HashMap<&str, String> = HashMap::new();
    ids.map(|id| {
        if id == AIR {
            return AIR.to_string();
        }
        memo.entry(id).or_insert_with(|| canonicalize(id)).clone()
    })
    .collect()
}

impl StructureModel {
    /// Build from raw identifiers. `minecraft:air` stays air, everything
    /// else is canonicalized.
    pub fn new<S: AsRef<str>>(width: usize, height: usize, ids: &[S]) -> Result<Self, StructureError> {
        check_size(width, height, ids.len())?;
        Ok(Self {
            width,
            height,
            cells: canonical_cells(ids.iter().map(AsRef::as_ref)),
            unmapped: 0,
        })
    }

    /// Resolve a raster through its own palette snapshot.
    pub fn from_raster(raster: &QuantizedRaster) -> Result<Self, StructureError> {
        let snapshot = raster.snapshot();
        check_size(raster.width(), raster.height(), raster.indices().len())?;

        let mut unmapped = 0usize;
        let ids = raster.indices().iter().map(|&i| match snapshot.get(i as usize) {
            Some(entry) => entry.block_id.as_str(),
            None => {
                unmapped += 1;
                AIR
            }
        });
        let cells = canonical_cells(ids);
        if unmapped > 0 {
            tracing::warn!(unmapped, "Raster indices outside the palette snapshot became air");
        }

        Ok(Self {
            width: raster.width(),
            height: raster.height(),
            cells,
            unmapped,
        })
    }

    /// Build from already quantized RGB pixels by exact color lookup.
    ///
    /// The first snapshot entry with a given color wins. Colors with no
    /// entry become air and are counted in [`unmapped`](Self::unmapped).
    pub fn from_rgb_pixels(
        pixels: &[Rgb],
        width: usize,
        height: usize,
        snapshot: &PaletteSnapshot,
    ) -> Result<Self, StructureError> {
        check_size(width, height, pixels.len())?;
        let lookup = snapshot.rgb_index();

        let mut unmapped = 0usize;
        let ids = pixels.iter().map(|rgb| match lookup.get(rgb) {
            Some(&i) => snapshot[i].block_id.as_str(),
            None => {
                unmapped += 1;
                AIR
            }
        });
        let cells = canonical_cells(ids);

        tracing::debug!(
            palette = snapshot.len(),
            unmapped,
            cells = width * height,
            "Built structure model from pixels"
        );
        if unmapped > 0 {
            tracing::warn!(unmapped, "Pixels without a palette entry became air");
        }

        Ok(Self {
            width,
            height,
            cells,
            unmapped,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Identifier at source cell `(x, z)`.
    pub fn cell(&self, x: usize, z: usize) -> Option<&str> {
        if x >= self.width || z >= self.height {
            return None;
        }
        Some(&self.cells[z * self.width + x])
    }

    /// Cells that became air because their color had no palette entry.
    pub fn unmapped(&self) -> usize {
        self.unmapped
    }

    /// Distinct identifiers in first-occurrence order.
    pub fn distinct_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.cells
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
