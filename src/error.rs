use thiserror::Error;

use mapart_core::{ConvertError, StructureError};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Error from the convert/export pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("Invalid custom color {color:?} for {id}: {reason}")]
    InvalidCustomColor { id: String, color: String, reason: String },

    #[error("Import file error: {0}")]
    Import(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::from(ImageError::Empty { width: 0, height: 4 });
        assert_eq!(err.to_string(), "Image error: Image is empty (0x4)");

        let err = PipelineError::from(ConvertError::PaletteFilteredEmpty);
        assert!(err.to_string().starts_with("Conversion error: "));

        let err = PipelineError::InvalidCustomColor {
            id: "my:block".into(),
            color: "#zz".into(),
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "Invalid custom color \"#zz\" for my:block: bad");
    }
}
