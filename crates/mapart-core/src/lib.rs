// Generated LUT tables and long kernel literals trip a few pedantic lints.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::manual_range_contains
)]

//! mapart-core: palette matching, dithering and structure export for
//! block map art.
//!
//! An image is quantized against a palette of colored blocks, then written
//! out as a structure file a game client can paste into a world.
//!
//! # Quick Start
//!
//! ```
//! use mapart_core::api::Converter;
//! use mapart_core::color::Rgb;
//! use mapart_core::dither::DitherMethod;
//! use mapart_core::session::Session;
//! use mapart_core::structure::{JavaExporter, StructureModel};
//!
//! let mut session = Session::default();
//! let pixels = vec![Rgb::new(160, 40, 35), Rgb::new(90, 120, 40)];
//!
//! let raster = Converter::new()
//!     .method(DitherMethod::FloydSteinberg)
//!     .convert(&mut session, &pixels, 2, 1)?;
//!
//! let model = StructureModel::from_raster(&raster)?;
//! let bytes = JavaExporter::new().encode(&model)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! sRGB pixels
//!     |
//!     v
//! Session ──> ActivePalette (wool, terracotta, concrete, custom, imported)
//!     |          + PreferenceTable / GroupWeights
//!     v
//! Converter ──> one policy per DitherMethod
//!     |           none | floyd-steinberg | jarvis-judice-ninke
//!     |           atkinson | ordered | guided
//!     v
//! QuantizedRaster (indices + PaletteSnapshot + Diagnostics)
//!     |
//!     v
//! StructureModel (canonical block ids)
//!     |
//!     +──> BedrockExporter  little-endian .mcstructure, 64x64 tiles
//!     +──> JavaExporter     gzip big-endian .nbt
//! ```
//!
//! # Color Science
//!
//! Palette lookups for the classic policies use CIE Lab and the CIEDE2000
//! difference, divided by the entry and group weights. The error-diffusion
//! kernels themselves carry error in sRGB channel space, which keeps their
//! output identical to the reference images users compare against.
//!
//! The guided policy works in Oklab instead. Its cost separates lightness,
//! chroma and hue:
//!
//! ```text
//! cost = wL*dL^2 + wC*dC^2 + wH*4*Cavg^2*sin^2(dh/2)
//!      + penalty_k*material_penalty + gray guard + white guard
//! ```
//!
//! The hue term uses the chord length on the chroma circle, so it vanishes
//! smoothly as either color approaches gray. The two guards stop neutral and
//! near-white blocks from absorbing saturated pixels.

pub mod api;
pub mod color;
pub mod dither;
pub mod matcher;
pub mod output;
pub mod palette;
pub mod session;
pub mod settings;
pub mod structure;


pub use api::{ConvertError, Converter};
pub use color::Rgb;
pub use dither::{DitherMethod, DitherOptions, GuidedOptions};
pub use matcher::NearestColorMatcher;
pub use output::{PaletteSnapshot, QuantizedRaster};
pub use palette::{ActivePalette, PaletteEntry, SourceSelection};
pub use session::Session;
pub use structure::{BedrockExporter, JavaExporter, StructureError, StructureModel};
