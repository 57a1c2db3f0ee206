pub mod pipeline;

pub use pipeline::{load_imported, load_settings, save_settings, sorted_counts, Pipeline};
