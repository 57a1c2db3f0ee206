//! Quantization results.
//!
//! A [`QuantizedRaster`] stores one palette index per pixel together with the
//! [`PaletteSnapshot`] those indices refer to. Indices are only ever resolved
//! through that snapshot, so later palette edits cannot change what an
//! already-quantized raster exports as.

mod counts;
mod raster;
mod snapshot;

pub use counts::BlockCount;
pub use raster::{Diagnostics, QuantizedRaster};
pub use snapshot::PaletteSnapshot;
