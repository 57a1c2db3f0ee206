use crate::color::Rgb;

/// Usage of one palette entry in a quantized raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCount {
    pub block_id: String,
    pub label: String,
    pub rgb: Rgb,
    pub count: usize,
}
