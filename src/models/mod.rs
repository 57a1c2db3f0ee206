pub mod config;

pub use config::{
    AppConfig, CustomBlockConfig, DitherConfig, ExportConfig, ExportFormat, ImportConfig, PaletteConfig, CONFIG_FILE,
};
