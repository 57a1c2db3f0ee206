//! Bedrock Edition `.mcstructure` export.

use std::collections::HashMap;

use rayon::prelude::*;

use super::ident::AIR;
use super::model::StructureModel;
use super::nbt::{write_root, Compound, Endian, List, TagType};
use super::tile::{Tile, TilePlan, MAX_EXTENT};
use super::transform::Orientation;
use super::StructureError;

/// Block state version written into every palette entry.
pub const BLOCK_VERSION: i32 = 18168865;

/// One encoded tile and its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockTile {
    pub tile: Tile,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Writes a model as one or more little-endian `.mcstructure` files.
///
/// # Example
///
/// ```
/// use mapart_core::structure::{BedrockExporter, StructureModel};
///
/// let model = StructureModel::new(2, 1, &["minecraft:red_wool", "minecraft:blue_wool"])?;
/// let tiles = BedrockExporter::new().encode(&model, "art")?;
///
/// assert_eq!(tiles.len(), 1);
/// assert_eq!(tiles[0].file_name, "art_X0_Y0.mcstructure");
/// # Ok::<(), mapart_core::structure::StructureError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedrockExporter {
    /// Default: [`Orientation::BEDROCK`]
    pub orientation: Orientation,
    /// Default: [`MAX_EXTENT`]
    pub max_extent: usize,
}

impl Default for BedrockExporter {
    fn default() -> Self {
        Self {
            orientation: Orientation::BEDROCK,
            max_extent: MAX_EXTENT,
        }
    }
}

impl BedrockExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Values below 1 are raised to 1.
    pub fn max_extent(mut self, max_extent: usize) -> Self {
        self.max_extent = max_extent.max(1);
        self
    }

    /// Tile layout of the oriented output footprint.
    pub fn plan(&self, model: &StructureModel) -> TilePlan {
        let (out_w, out_h) = self.orientation.output_size(model.width(), model.height());
        TilePlan::new(out_w, out_h, self.max_extent)
    }

    /// Tag tree for a single tile.
    pub fn tile_root(&self, model: &StructureModel, tile: &Tile) -> Compound {
        let mut palette: Vec<&str> = Vec::new();
        let mut slot: HashMap<&str, i32> = HashMap::new();
        let mut primary = Vec::with_capacity(tile.cells());

        // z-major: index = z * width + x.
        for z in 0..tile.depth {
            for x in 0..tile.width {
                let id = self
                    .orientation
                    .source_of(tile.x0 + x, tile.z0 + z, model.width(), model.height())
                    .and_then(|(sx, sz)| model.cell(sx, sz))
                    .unwrap_or(AIR);
                let index = *slot.entry(id).or_insert_with(|| {
                    palette.push(id);
                    palette.len() as i32 - 1
                });
                primary.push(index);
            }
        }

        let block_palette = List::compounds(palette.iter().map(|&name| {
            Compound::new()
                .with("name", name)
                .with("states", Compound::new())
                .with("version", BLOCK_VERSION)
        }));
        let secondary = List::ints(std::iter::repeat(-1).take(primary.len()));

        let structure = Compound::new()
            .with("block_indices", List::lists([List::ints(primary), secondary]))
            .with("entities", List::empty(TagType::Compound))
            .with(
                "palette",
                Compound::new().with(
                    "default",
                    Compound::new()
                        .with("block_palette", block_palette)
                        .with("block_position_data", Compound::new()),
                ),
            );

        Compound::new()
            .with("format_version", 1i32)
            .with("size", List::ints([tile.width as i32, 1, tile.depth as i32]))
            .with("structure", structure)
            .with("structure_world_origin", List::ints([0, 0, 0]))
    }

    /// Encoded bytes of one tile.
    pub fn encode_tile(&self, model: &StructureModel, tile: &Tile) -> Result<Vec<u8>, StructureError> {
        Ok(write_root("", &self.tile_root(model, tile), Endian::Little)?)
    }

    /// Encode every tile, in plan order.
    pub fn encode(&self, model: &StructureModel, base_name: &str) -> Result<Vec<BedrockTile>, StructureError> {
        let plan = self.plan(model);
        tracing::debug!(
            width = model.width(),
            height = model.height(),
            tiles_x = plan.tiles_x(),
            tiles_z = plan.tiles_z(),
            "Encoding Bedrock structure"
        );

        plan.tiles()
            .par_iter()
            .map(|tile| {
                Ok(BedrockTile {
                    tile: *tile,
                    file_name: tile_file_name(base_name, tile),
                    bytes: self.encode_tile(model, tile)?,
                })
            })
            .collect()
    }
}

/// `{base}_X{tz}_Y{tx}.mcstructure`
pub fn tile_file_name(base_name: &str, tile: &Tile) -> String {
    format!("{base_name}_X{}_Y{}.mcstructure", tile.tz, tile.tx)
}
