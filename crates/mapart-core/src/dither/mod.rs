//! Image quantization policies.
//!
//! Every policy maps a row-major sRGB image onto indices of the active
//! palette through a [`NearestColorMatcher`]:
//!
//! - **Direct**: independent perceptual nearest match per pixel.
//! - **Classic error diffusion**: Floyd-Steinberg, Jarvis-Judice-Ninke and
//!   Atkinson kernels, matched by Euclidean sRGB distance, with optional
//!   local-contrast ("natural") strength modulation.
//! - **Ordered**: tileable blue-noise threshold lookup. The threshold does
//!   not contribute to the decision, so the output equals direct matching.
//! - **Guided**: Oklab pipeline with optional guided-filter smoothing,
//!   lightness unsharp, edge-aware serpentine Floyd-Steinberg and
//!   palette-membership guards. See [`GuidedPipeline`].
//!
//! All policies write into a fresh index buffer owned by one invocation and
//! only hand it back once the scan completed.
//!
//! # Example
//!
//! ```
//! use mapart_core::color::{LabCache, Rgb};
//! use mapart_core::dither::{Dither, DitherOptions, FloydSteinberg};
//! use mapart_core::matcher::NearestColorMatcher;
//! use mapart_core::palette::{assemble, GroupWeights, PreferenceTable, SourceSelection};
//!
//! let mut cache = LabCache::new();
//! let palette = assemble(&SourceSelection::default(), &[], &[], &mut cache);
//! let prefs = PreferenceTable::new();
//! let groups = GroupWeights::new();
//! let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
//!
//! let pixels = vec![Rgb::new(120, 90, 60); 4 * 4];
//! let out = FloydSteinberg.dither(&pixels, 4, 4, &matcher, &mut cache, &DitherOptions::new());
//! assert_eq!(out.indices.len(), 16);
//! ```

mod blue_noise;
mod diffusion;
mod direct;
pub mod guided;
mod kernel;
mod natural;
mod options;
mod ordered;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use blue_noise::{bayer_8, ThresholdMatrix, BLUE_NOISE_16};
pub use diffusion::{dither_with_kernel, Atkinson, FloydSteinberg, JarvisJudiceNinke};
pub use direct::Direct;
pub use guided::{FamilyAllow, FamilyWeights, GuidedOptions, GuidedPipeline, MIN_EDGE_SLOPE};
pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE};
pub use natural::{local_strength, MIN_STRENGTH};
pub use options::DitherOptions;
pub use ordered::OrderedBlueNoise;

use crate::color::{LabCache, Rgb};
use crate::matcher::NearestColorMatcher;
use crate::output::Diagnostics;

/// Quantization policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMethod {
    /// Direct nearest match, no diffusion.
    None,

    /// Floyd-Steinberg error diffusion (4 taps, 100% propagation).
    #[default]
    FloydSteinberg,

    /// Jarvis-Judice-Ninke error diffusion (12 taps, 100% propagation).
    JarvisJudiceNinke,

    /// Atkinson error diffusion (6 taps, 75% propagation).
    Atkinson,

    /// Blue-noise ordered lookup.
    Ordered,

    /// Oklab guided pipeline.
    Guided,
}

impl DitherMethod {
    pub const ALL: [DitherMethod; 6] = [
        DitherMethod::None,
        DitherMethod::FloydSteinberg,
        DitherMethod::JarvisJudiceNinke,
        DitherMethod::Atkinson,
        DitherMethod::Ordered,
        DitherMethod::Guided,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DitherMethod::None => "none",
            DitherMethod::FloydSteinberg => "floyd-steinberg",
            DitherMethod::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherMethod::Atkinson => "atkinson",
            DitherMethod::Ordered => "ordered",
            DitherMethod::Guided => "guided",
        }
    }

    /// Diffusion kernel of the classic policies.
    pub fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherMethod::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherMethod::JarvisJudiceNinke => Some(&JARVIS_JUDICE_NINKE),
            DitherMethod::Atkinson => Some(&ATKINSON),
            _ => None,
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dithering method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dithering method `{0}`")]
pub struct UnknownMethod(pub String);

impl FromStr for DitherMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "fs" => return Ok(DitherMethod::FloydSteinberg),
            "jjn" => return Ok(DitherMethod::JarvisJudiceNinke),
            "blue-noise" => return Ok(DitherMethod::Ordered),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Indices plus diagnostics produced by one policy run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dithered {
    /// Row-major indices into the matcher's palette.
    pub indices: Vec<u16>,
    pub diagnostics: Diagnostics,
}

/// A quantization policy over a row-major sRGB image.
pub trait Dither {
    /// Quantize `image` (`width * height` pixels, row-major).
    ///
    /// `cache` memoizes Lab conversions for perceptual lookups and must
    /// belong to the palette the matcher was built from.
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        matcher: &NearestColorMatcher<'_>,
        cache: &mut LabCache,
        options: &DitherOptions,
    ) -> Dithered;
}

/// Sliding window of error rows.
///
/// Stores only the rows a diffusion kernel can reach, with `rows[0]` being
/// the row currently scanned.
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// `row_depth` is the kernel's largest `dy` plus one.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-window targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Drop the current row and append a zeroed one.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        for m in DitherMethod::ALL {
            assert_eq!(m.as_str().parse::<DitherMethod>().unwrap(), m);
        }
        assert_eq!("JJN".parse::<DitherMethod>().unwrap(), DitherMethod::JarvisJudiceNinke);
        assert_eq!("floyd_steinberg".parse::<DitherMethod>().unwrap(), DitherMethod::FloydSteinberg);
        assert!("sierra".parse::<DitherMethod>().is_err());
    }

    #[test]
    fn test_method_serde_is_kebab_case() {
        let json = serde_json::to_string(&DitherMethod::JarvisJudiceNinke).unwrap();
        assert_eq!(json, "\"jarvis-judice-ninke\"");
        let m: DitherMethod = serde_json::from_str("\"guided\"").unwrap();
        assert_eq!(m, DitherMethod::Guided);
    }

    #[test]
    fn test_kernel_only_for_classic() {
        assert!(DitherMethod::FloydSteinberg.kernel().is_some());
        assert!(DitherMethod::Ordered.kernel().is_none());
        assert!(DitherMethod::Guided.kernel().is_none());
    }

    #[test]
    fn test_error_buffer_rotation() {
        let mut buf = ErrorBuffer::new(3, 2);
        buf.add_error(1, 1, [1.0, 2.0, 3.0]);
        buf.add_error(5, 0, [9.0, 9.0, 9.0]);
        buf.add_error(0, 2, [9.0, 9.0, 9.0]);
        assert_eq!(buf.get_accumulated(1), [0.0; 3]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), [1.0, 2.0, 3.0]);
        assert_eq!(buf.get_accumulated(0), [0.0; 3]);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), [0.0; 3]);
    }
}
