//! Config + settings → session → raster → files.

use std::path::{Path, PathBuf};

use mapart_core::api::Converter;
use mapart_core::dither::DitherMethod;
use mapart_core::output::{BlockCount, QuantizedRaster};
use mapart_core::palette::{import_blocks, ImportAllowList, ImportedBlock, PaletteEntry};
use mapart_core::session::Session;
use mapart_core::settings::PersistedSettings;
use mapart_core::structure::{BedrockExporter, JavaExporter, StructureModel};

use crate::error::PipelineError;
use crate::models::{AppConfig, ExportFormat};
use crate::rendering::{encode_rgba_png, DecodedImage};

/// Load the persisted settings document, falling back to defaults
pub fn load_settings(path: &Path) -> PersistedSettings {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<PersistedSettings>(&s).map_err(|e| e.to_string()));
    match parsed {
        Ok(settings) => {
            tracing::info!(
                custom = settings.custom_palette.len(),
                prefs = settings.block_prefs.len(),
                "Loaded settings"
            );
            settings
        }
        Err(e) => {
            tracing::warn!(%e, path = %path.display(), "Failed to load settings, using defaults");
            PersistedSettings::default()
        }
    }
}

/// Write the persisted settings document
pub fn save_settings(path: &Path, settings: &PersistedSettings) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a JSON list of `{rgb, id, label}` records
pub fn load_imported(path: &Path) -> Result<Vec<ImportedBlock>, PipelineError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Usage counts, most used first
pub fn sorted_counts(raster: &QuantizedRaster) -> Vec<BlockCount> {
    let mut counts = raster.block_counts();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Orchestrates palette assembly, conversion and export
pub struct Pipeline {
    session: Session,
    converter: Converter,
    export_name: String,
    format: ExportFormat,
}

impl Pipeline {
    /// Build from config and settings, reading the import file if one is configured.
    pub fn new(config: &AppConfig, settings: &PersistedSettings) -> Result<Self, PipelineError> {
        let imported = match &config.import.blocks {
            Some(path) => load_imported(path)?,
            None => Vec::new(),
        };
        Self::with_imported(config, settings, &imported)
    }

    /// Build from config, settings and already loaded import records.
    ///
    /// Settings take precedence: their custom entries follow the config's,
    /// their weights and preferences replace the config's, and their
    /// category flags override the config's category list.
    pub fn with_imported(
        config: &AppConfig,
        settings: &PersistedSettings,
        imported: &[ImportedBlock],
    ) -> Result<Self, PipelineError> {
        let mut custom = config
            .custom
            .iter()
            .map(|block| {
                block.to_entry().map_err(|e| PipelineError::InvalidCustomColor {
                    id: block.id.clone(),
                    color: block.color.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<PaletteEntry>, _>>()?;
        custom.extend(settings.custom_palette.iter().cloned());

        let allow = ImportAllowList::new(config.import.allow.clone());
        let catalog = if allow.is_empty() || imported.is_empty() {
            Default::default()
        } else {
            import_blocks(imported, &allow)
        };
        let mut flags = config
            .palette
            .category_flags(catalog.categories.iter().map(|(k, _)| k.as_str()));
        flags.extend(settings.dynamic_categories.iter().map(|(k, v)| (k.clone(), *v)));
        let groups = catalog.into_groups(&flags);

        let mut merged = settings.clone();
        merged.custom_palette = custom;
        if settings == &PersistedSettings::default() {
            merged.group_weights = config.group_weights.clone();
            merged.block_prefs = config.block_prefs.clone();
        }
        let session = Session::from_settings(&config.palette.selection(), &merged, &groups);

        let converter = Converter::new()
            .method(config.dither.method)
            .natural(config.dither.natural)
            .natural_strength(config.dither.strength_ratio())
            .guided(config.guided);

        Ok(Self {
            session,
            converter,
            export_name: config.export.name.clone(),
            format: config.export.format,
        })
    }

    pub fn method(mut self, method: DitherMethod) -> Self {
        self.converter = self.converter.method(method);
        self
    }

    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = name.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn convert(&mut self, image: &DecodedImage) -> Result<QuantizedRaster, PipelineError> {
        let raster = self.converter.convert(
            &mut self.session,
            &image.pixels,
            image.width as usize,
            image.height as usize,
        )?;
        tracing::info!(
            method = %self.converter.selected_method(),
            width = image.width,
            height = image.height,
            fallback_pixels = raster.diagnostics().fallback_pixels,
            "Converted image"
        );
        Ok(raster)
    }

    /// Opaque RGBA preview of a raster.
    pub fn preview_png(raster: &QuantizedRaster) -> Result<Vec<u8>, PipelineError> {
        Ok(encode_rgba_png(
            raster.width() as u32,
            raster.height() as u32,
            &raster.to_rgba(),
        )?)
    }

    /// Write structure file(s) into `dir` and return their paths.
    pub fn export(&self, raster: &QuantizedRaster, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let model = StructureModel::from_raster(raster)?;
        std::fs::create_dir_all(dir)?;

        let written = match self.format {
            ExportFormat::Bedrock => {
                let tiles = BedrockExporter::new().encode(&model, &self.export_name)?;
                let mut paths = Vec::with_capacity(tiles.len());
                for tile in tiles {
                    let path = dir.join(&tile.file_name);
                    std::fs::write(&path, &tile.bytes)?;
                    paths.push(path);
                }
                paths
            }
            ExportFormat::Java => {
                let bytes = JavaExporter::new().encode(&model)?;
                let path = dir.join(format!("{}.nbt", self.export_name));
                std::fs::write(&path, bytes)?;
                vec![path]
            }
        };

        tracing::info!(format = ?self.format, files = written.len(), "Exported structure");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapart_core::color::Rgb;
    use mapart_core::palette::AllowRule;

    use crate::models::CustomBlockConfig;

    fn image(pixels: Vec<Rgb>, width: u32, height: u32) -> DecodedImage {
        DecodedImage { width, height, pixels }
    }

    #[test]
    fn test_custom_blocks_merge_in_order() {
        let mut config = AppConfig::default();
        config.palette.wool = false;
        config.palette.terracotta = false;
        config.palette.concrete = false;
        config.custom = vec![CustomBlockConfig {
            color: "#102030".into(),
            id: "my:config".into(),
            label: String::new(),
        }];
        let settings = PersistedSettings {
            custom_palette: vec![PaletteEntry::new(Rgb::new(1, 1, 1), "my:settings", "", "")],
            ..Default::default()
        };

        let pipeline = Pipeline::with_imported(&config, &settings, &[]).unwrap();
        let ids: Vec<_> = pipeline
            .session()
            .palette()
            .entries()
            .iter()
            .map(|e| e.block_id.as_str())
            .collect();
        assert_eq!(ids, ["my:config", "my:settings"]);
    }

    #[test]
    fn test_invalid_custom_color_is_an_error() {
        let mut config = AppConfig::default();
        config.custom = vec![CustomBlockConfig {
            color: "nope".into(),
            id: "my:block".into(),
            label: String::new(),
        }];
        let result = Pipeline::with_imported(&config, &PersistedSettings::default(), &[]);
        assert!(matches!(result, Err(PipelineError::InvalidCustomColor { .. })));
    }

    #[test]
    fn test_imported_categories_follow_flags() {
        let mut config = AppConfig::default();
        config.palette = crate::models::PaletteConfig {
            wool: false,
            terracotta: false,
            concrete: false,
            custom: false,
            categories: vec!["gray".into()],
        };
        config.import.allow = vec![
            AllowRule {
                label: "Stone".into(),
                category: "gray".into(),
                ids: vec!["minecraft:stone".into()],
            },
            AllowRule {
                label: "Dirt".into(),
                category: "brown".into(),
                ids: vec!["minecraft:dirt".into()],
            },
        ];
        let imported = [
            ImportedBlock {
                rgb: Rgb::new(120, 120, 120),
                id: "minecraft:stone".into(),
                label: "Stone".into(),
            },
            ImportedBlock {
                rgb: Rgb::new(130, 90, 60),
                id: "minecraft:dirt".into(),
                label: "Dirt".into(),
            },
        ];

        let pipeline = Pipeline::with_imported(&config, &PersistedSettings::default(), &imported).unwrap();
        let ids: Vec<_> = pipeline
            .session()
            .palette()
            .entries()
            .iter()
            .map(|e| e.block_id.as_str())
            .collect();
        assert_eq!(ids, ["minecraft:stone"]);

        let settings = PersistedSettings {
            dynamic_categories: [("brown".to_string(), true)].into(),
            ..Default::default()
        };
        let pipeline = Pipeline::with_imported(&config, &settings, &imported).unwrap();
        assert_eq!(pipeline.session().palette().len(), 2);
    }

    #[test]
    fn test_sorted_counts() {
        let mut pipeline = Pipeline::with_imported(&AppConfig::default(), &PersistedSettings::default(), &[])
            .unwrap()
            .method(DitherMethod::None);
        let white = Rgb::new(233, 236, 236);
        let black = Rgb::new(20, 21, 25);
        let raster = pipeline.convert(&image(vec![white, black, black], 3, 1)).unwrap();
        let counts = sorted_counts(&raster);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].block_id, "minecraft:white_wool");
    }
}
