use thiserror::Error;

/// Conversions that abort before producing a raster.
///
/// # Example
///
/// ```
/// use mapart_core::api::{ConvertError, Converter};
/// use mapart_core::session::Session;
///
/// let mut session = Session::default();
/// let err = Converter::new().convert(&mut session, &[], 0, 0).unwrap_err();
/// assert!(matches!(err, ConvertError::EmptyImage { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("image is empty ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("pixel buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("no palette entry is allowed by the current family selection")]
    PaletteFilteredEmpty,

    #[error("palette has {0} entries, more than a raster index can address")]
    PaletteTooLarge(usize),
}
