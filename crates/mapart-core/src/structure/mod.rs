//! Block-structure export.
//!
//! A [`StructureModel`] holds one canonical block identifier per raster
//! cell. Exporters turn it into files:
//!
//! - [`BedrockExporter`]: little-endian `.mcstructure` tiles of at most
//!   [`MAX_EXTENT`] per axis, rotated and mirrored into the Bedrock layout.
//! - [`JavaExporter`]: one gzip-compressed big-endian `.nbt` structure.
//!
//! Identifiers are normalized by [`ident::canonicalize`] on the way in,
//! so every exported name is either air or on the allow-list.

mod bedrock;
mod error;
pub mod ident;
mod java;
mod model;
pub mod nbt;
mod tile;
mod transform;

pub use bedrock::{tile_file_name, BedrockExporter, BedrockTile, BLOCK_VERSION};
pub use error::StructureError;
pub use java::{JavaExporter, DATA_VERSION};
pub use model::StructureModel;
pub use tile::{Tile, TilePlan, MAX_EXTENT};
pub use transform::Orientation;
