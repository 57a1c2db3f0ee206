use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    /// Zero width or height, reported before anything is written.
    #[error("structure model is empty ({width}x{height})")]
    EmptyModel { width: usize, height: usize },

    #[error("model has {actual} cells, expected {expected}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed NBT: {0}")]
    Decode(String),
}
