//! Java Edition structure-block `.nbt` export.

use std::collections::HashMap;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use super::ident::AIR;
use super::model::StructureModel;
use super::nbt::{write_root, Compound, Endian, List, TagType};
use super::StructureError;

/// Data version stamped on exported structures.
pub const DATA_VERSION: i32 = 3465;

/// Writes a model as a single gzip-compressed big-endian structure.
///
/// The layout is the source raster as-is: `x` across, `z` down, no
/// rotation and no tiling. Air cells are left out of `blocks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JavaExporter {
    /// Default: [`DATA_VERSION`]
    pub data_version: i32,
    /// Default: `Compression::default()`
    pub compression: Compression,
}

impl Default for JavaExporter {
    fn default() -> Self {
        Self {
            data_version: DATA_VERSION,
            compression: Compression::default(),
        }
    }
}

impl JavaExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_version(mut self, data_version: i32) -> Self {
        self.data_version = data_version;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn root(&self, model: &StructureModel) -> Compound {
        let mut names: Vec<&str> = Vec::new();
        let mut state_of: HashMap<&str, i32> = HashMap::new();
        let mut blocks = Vec::new();

        for z in 0..model.height() {
            for x in 0..model.width() {
                let Some(id) = model.cell(x, z).filter(|id| *id != AIR) else {
                    continue;
                };
                let state = *state_of.entry(id).or_insert_with(|| {
                    names.push(id);
                    names.len() as i32 - 1
                });
                blocks.push(
                    Compound::new()
                        .with("state", state)
                        .with("pos", List::ints([x as i32, 0, z as i32])),
                );
            }
        }

        Compound::new()
            .with("DataVersion", self.data_version)
            .with("size", List::ints([model.width() as i32, 1, model.height() as i32]))
            .with(
                "palette",
                List::compounds(names.iter().map(|&name| Compound::new().with("Name", name))),
            )
            .with("blocks", List::compounds(blocks))
            .with("entities", List::empty(TagType::Compound))
    }

    /// Big-endian NBT before compression.
    pub fn encode_uncompressed(&self, model: &StructureModel) -> Result<Vec<u8>, StructureError> {
        Ok(write_root("", &self.root(model), Endian::Big)?)
    }

    /// Gzip-compressed file contents.
    pub fn encode(&self, model: &StructureModel) -> Result<Vec<u8>, StructureError> {
        let raw = self.encode_uncompressed(model)?;
        let mut encoder = GzEncoder::new(Vec::with_capacity(raw.len() / 4), self.compression);
        encoder.write_all(&raw)?;
        let bytes = encoder.finish()?;
        tracing::debug!(raw = raw.len(), compressed = bytes.len(), "Encoded Java structure");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::nbt::{read_root, Tag};
    use flate2::read::GzDecoder;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn list<'a>(root: &'a Compound, name: &str) -> &'a List {
        root.get(name).and_then(Tag::as_list).unwrap()
    }

    #[test]
    fn test_root_layout() {
        let model = StructureModel::new(
            2,
            2,
            &["minecraft:red_wool", AIR, "minecraft:blue_concrete", "minecraft:red_wool"],
        )
        .unwrap();
        let root = JavaExporter::new().root(&model);

        assert_eq!(root.get("DataVersion").and_then(Tag::as_int), Some(DATA_VERSION));
        assert_eq!(list(&root, "size").to_ints(), Some(vec![2, 1, 2]));

        let names: Vec<_> = list(&root, "palette")
            .items()
            .iter()
            .map(|t| t.as_compound().unwrap().get("Name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, ["minecraft:red_wool", "minecraft:blue_concrete"]);

        let blocks: Vec<_> = list(&root, "blocks")
            .items()
            .iter()
            .map(|t| {
                let c = t.as_compound().unwrap();
                let state = c.get("state").unwrap().as_int().unwrap();
                let pos = c.get("pos").unwrap().as_list().unwrap().to_ints().unwrap();
                (state, pos)
            })
            .collect();
        assert_eq!(blocks, [(0, vec![0, 0, 0]), (1, vec![0, 0, 1]), (0, vec![1, 0, 1])]);

        let entities = list(&root, "entities");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_encode_is_gzipped_big_endian() {
        let model = StructureModel::new(1, 1, &["minecraft:red_wool"]).unwrap();
        let exporter = JavaExporter::new();
        let gz = exporter.encode(&model).unwrap();
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);

        let mut raw = Vec::new();
        GzDecoder::new(gz.as_slice()).read_to_end(&mut raw).unwrap();
        assert_eq!(raw, exporter.encode_uncompressed(&model).unwrap());

        let (name, root) = read_root(&raw, Endian::Big).unwrap();
        assert_eq!(name, "");
        assert_eq!(root, exporter.root(&model));
    }
}
