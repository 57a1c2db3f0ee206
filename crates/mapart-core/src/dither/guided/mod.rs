//! Oklab guided quantization.
//!
//! Stages, in order: filter the palette by allowed family, convert to
//! Oklab, optional guided-filter smoothing of L with a/b following,
//! lightness unsharp, Sobel edge map, then a serpentine Floyd-Steinberg
//! scan with a perceptual LCh cost and palette-membership guards. The
//! natural lightness phase reads the 8x8 Bayer matrix.

mod filter;
mod options;

pub use filter::{box_mean, guided_filter, guided_follow, sobel_magnitude, unsharp};
pub use options::{FamilyAllow, FamilyWeights, GuidedOptions, MIN_EDGE_SLOPE};

use std::f32::consts::PI;

use super::blue_noise::ThresholdMatrix;
use super::{Dithered, ErrorBuffer};
use crate::api::ConvertError;
use crate::color::{Oklab, Oklch, Rgb};
use crate::matcher::NearestColorMatcher;
use crate::output::Diagnostics;
use crate::palette::Family;

/// One selectable palette entry in Oklab/LCh.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: u16,
    rgb: Rgb,
    lab: Oklab,
    chroma: f32,
    hue: f32,
    penalty: f32,
}

/// Matrix behind the natural lightness phase.
const NATURAL_MATRIX: ThresholdMatrix = ThresholdMatrix::Bayer;

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Share of the error that diffuses at a pixel, in `0.5..=1.0`.
#[inline]
fn edge_multiplier(edge: f32, threshold: f32, slope: f32) -> f32 {
    0.5 + 0.5 * sigmoid((threshold - edge) / slope)
}

/// Hue difference wrapped into `-PI..=PI`.
#[inline]
fn delta_hue(h1: f32, h2: f32) -> f32 {
    let mut d = h1 - h2;
    if d > PI {
        d -= 2.0 * PI;
    }
    if d < -PI {
        d += 2.0 * PI;
    }
    d
}

/// The guided pipeline with its option bundle.
#[derive(Debug, Clone, Default)]
pub struct GuidedPipeline {
    pub options: GuidedOptions,
}

impl GuidedPipeline {
    pub fn new(options: GuidedOptions) -> Self {
        Self { options }
    }

    /// Entries of allowed families that the matcher has enabled.
    fn candidates(&self, matcher: &NearestColorMatcher<'_>) -> Vec<Candidate> {
        let allow = self.options.allow.resolved();
        matcher
            .palette()
            .entries()
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let family = Family::classify(&entry.block_id);
                if !allow.allows(family) || !matcher.is_enabled(i) {
                    return None;
                }
                let lab = Oklab::from(entry.rgb);
                let lch = Oklch::from(lab);
                Some(Candidate {
                    index: i as u16,
                    rgb: entry.rgb,
                    lab,
                    chroma: lch.c,
                    hue: lch.h,
                    penalty: self.options.family_weights.penalty(family),
                })
            })
            .collect()
    }

    /// Weighted LCh distance plus material penalty and guards.
    #[inline]
    fn cost(&self, l: f32, chroma: f32, hue: f32, cand: &Candidate) -> f32 {
        let o = &self.options;
        let dl = l - cand.lab.l;
        let dc = chroma - cand.chroma;
        let dh = delta_hue(hue, cand.hue);
        let c_avg = 0.5 * (chroma + cand.chroma);
        let dh2 = 4.0 * c_avg * c_avg * (dh * 0.5).sin().powi(2);

        let mut d = o.weight_l * dl * dl + o.weight_c * dc * dc + o.weight_h * dh2 + o.penalty_k * cand.penalty;

        if chroma > 0.06 && cand.chroma < 0.03 {
            d += o.gray_bias * (chroma - cand.chroma);
        }
        if cand.lab.l > 0.92 && chroma > 0.05 {
            d += o.white_guard_l * (cand.lab.l - l).max(0.0).powi(2);
            d += o.white_guard_c * (chroma - cand.chroma).max(0.0).powi(2);
        }
        d
    }

    /// Quantize `image` against the matcher's palette.
    ///
    /// Fails with [`ConvertError::PaletteFilteredEmpty`] when the family
    /// filter leaves no candidate; nothing is produced in that case.
    pub fn run(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        matcher: &NearestColorMatcher<'_>,
    ) -> Result<Dithered, ConvertError> {
        let o = &self.options;
        let candidates = self.candidates(matcher);
        if candidates.is_empty() {
            tracing::warn!("No colors allowed by the current palette selection");
            return Err(ConvertError::PaletteFilteredEmpty);
        }
        tracing::debug!(candidates = candidates.len(), "Filtered guided palette");

        let n = width * height;
        let mut l_plane = Vec::with_capacity(n);
        let mut a_plane = Vec::with_capacity(n);
        let mut b_plane = Vec::with_capacity(n);
        for &rgb in image {
            let lab = Oklab::from(rgb);
            l_plane.push(lab.l);
            a_plane.push(lab.a);
            b_plane.push(lab.b);
        }

        if o.pre_smooth {
            guided_filter(&mut l_plane, width, height, o.radius, o.epsilon);
            guided_follow(&l_plane, &mut a_plane, width, height, o.radius, o.epsilon, o.follow_slope_cap);
            guided_follow(&l_plane, &mut b_plane, width, height, o.radius, o.epsilon, o.follow_slope_cap);
        }

        unsharp(&mut l_plane, width, height, o.unsharp_amount, o.unsharp_radius, o.unsharp_passes);

        let edge = o.edge_aware.then(|| sobel_magnitude(&l_plane, width, height));
        let edge_slope = o.effective_edge_slope();

        let mut indices = vec![0u16; n];
        let mut errors = ErrorBuffer::new(width, 2);
        let mut fallback_pixels = 0usize;

        for y in 0..height {
            let reverse = o.serpentine && y % 2 == 1;
            let step: isize = if reverse { -1 } else { 1 };

            for i in 0..width {
                let x = if reverse { width - 1 - i } else { i };
                let k = y * width + x;

                let acc = if o.use_dither { errors.get_accumulated(x) } else { [0.0; 3] };
                let mut l = l_plane[k] + acc[0];
                let a = a_plane[k] + acc[1];
                let b = b_plane[k] + acc[2];
                if o.natural && o.natural_strength > 0.0 {
                    l += o.natural_strength * NATURAL_MATRIX.centered(x, y);
                }

                let chroma = a.hypot(b);
                let hue = b.atan2(a);

                let mut best = 0usize;
                let mut best_d = f32::INFINITY;
                for (ci, cand) in candidates.iter().enumerate() {
                    let d = self.cost(l, chroma, hue, cand);
                    if d < best_d {
                        best_d = d;
                        best = ci;
                    }
                }
                if !best_d.is_finite() {
                    fallback_pixels += 1;
                    best = nearest_rgb(&candidates, image[k]);
                }

                let q = candidates[best];
                indices[k] = q.index;

                if !o.use_dither {
                    continue;
                }

                let mut err = [l - q.lab.l, a - q.lab.a, b - q.lab.b];
                if let Some(edge) = &edge {
                    let m = edge_multiplier(edge[k], o.edge_threshold, edge_slope);
                    for e in &mut err {
                        *e *= m;
                    }
                }

                let scaled = |f: f32| [err[0] * f, err[1] * f, err[2] * f];
                let right = x as isize + step;
                let left = x as isize - step;
                let in_row = |v: isize| v >= 0 && (v as usize) < width;

                if in_row(right) {
                    errors.add_error(right as usize, 0, scaled(7.0 / 16.0));
                }
                if y + 1 < height {
                    if in_row(left) {
                        errors.add_error(left as usize, 1, scaled(3.0 / 16.0));
                    }
                    errors.add_error(x, 1, scaled(5.0 / 16.0));
                    if in_row(right) {
                        errors.add_error(right as usize, 1, scaled(1.0 / 16.0));
                    }
                }
            }
            errors.advance_row();
        }

        if fallback_pixels > 0 {
            tracing::warn!(fallback_pixels, "Guided cost had no finite candidate, used sRGB match");
        }

        Ok(Dithered {
            indices,
            diagnostics: Diagnostics {
                fallback_pixels,
                ..Default::default()
            },
        })
    }
}

/// Plain Euclidean sRGB nearest among the candidates.
fn nearest_rgb(candidates: &[Candidate], src: Rgb) -> usize {
    let src = src.to_f32();
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (i, cand) in candidates.iter().enumerate() {
        let d = cand.rgb.distance_squared_f32(src);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{ActivePalette, GroupWeights, PaletteEntry, PreferenceTable};

    fn palette() -> ActivePalette {
        ActivePalette::from_entries([
            PaletteEntry::new(Rgb::new(20, 21, 25), "minecraft:black_wool", "", "wool"),
            PaletteEntry::new(Rgb::new(233, 236, 236), "minecraft:white_wool", "", "wool"),
            PaletteEntry::new(Rgb::new(142, 32, 32), "minecraft:red_concrete", "", "concrete"),
            PaletteEntry::new(Rgb::new(94, 168, 24), "minecraft:lime_concrete", "", "concrete"),
            PaletteEntry::new(Rgb::new(200, 200, 10), "my:gold", "", "custom"),
        ])
    }

    fn run(options: GuidedOptions, image: &[Rgb], w: usize, h: usize) -> Result<Dithered, ConvertError> {
        let palette = palette();
        let prefs = PreferenceTable::new();
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
        GuidedPipeline::new(options).run(image, w, h, &matcher)
    }

    #[test]
    fn test_empty_filter_aborts() {
        let only_terracotta = FamilyAllow {
            terracotta: true,
            ..FamilyAllow::default()
        };
        let err = run(GuidedOptions::new().allow(only_terracotta), &[Rgb::new(1, 2, 3)], 1, 1).unwrap_err();
        assert!(matches!(err, ConvertError::PaletteFilteredEmpty));
    }

    #[test]
    fn test_custom_excluded_by_default() {
        let image = vec![Rgb::new(200, 200, 10); 9];
        let out = run(GuidedOptions::new(), &image, 3, 3).unwrap();
        assert!(out.indices.iter().all(|&i| i != 4), "custom family must be filtered out");

        let all = run(GuidedOptions::new().allow(FamilyAllow::all()).use_dither(false).natural(false), &image, 3, 3)
            .unwrap();
        assert!(all.indices.iter().all(|&i| i == 4));
    }

    #[test]
    fn test_exact_colors_without_diffusion() {
        let image = [Rgb::new(20, 21, 25), Rgb::new(233, 236, 236), Rgb::new(142, 32, 32), Rgb::new(94, 168, 24)];
        let options = GuidedOptions {
            unsharp_amount: 0.0,
            ..GuidedOptions::new().use_dither(false).natural(false)
        };
        let out = run(options, &image, 4, 1).unwrap();
        assert_eq!(out.indices, vec![0, 1, 2, 3]);
        assert_eq!(out.diagnostics.fallback_pixels, 0);
    }

    #[test]
    fn test_disabled_entries_are_not_candidates() {
        let palette = palette();
        let mut prefs = PreferenceTable::new();
        prefs.set_enabled("minecraft:red_concrete", false);
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
        let out = GuidedPipeline::new(GuidedOptions::new())
            .run(&[Rgb::new(142, 32, 32); 4], 2, 2, &matcher)
            .unwrap();
        assert!(out.indices.iter().all(|&i| i != 2));
    }

    #[test]
    fn test_mid_gray_mixes_black_and_white() {
        let (w, h) = (16, 16);
        let palette = ActivePalette::from_entries([
            PaletteEntry::new(Rgb::new(20, 21, 25), "minecraft:black_wool", "", "wool"),
            PaletteEntry::new(Rgb::new(233, 236, 236), "minecraft:white_wool", "", "wool"),
        ]);
        let prefs = PreferenceTable::new();
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
        let image = vec![Rgb::new(128, 128, 128); w * h];
        let out = GuidedPipeline::default().run(&image, w, h, &matcher).unwrap();
        let whites = out.indices.iter().filter(|&&i| i == 1).count();
        let blacks = out.indices.iter().filter(|&&i| i == 0).count();
        assert!(whites > 0 && blacks > 0, "whites {whites}, blacks {blacks}");
    }

    #[test]
    fn test_material_penalty_steers_choice() {
        let image = vec![Rgb::new(120, 60, 30); 4];
        let base = GuidedOptions::new().use_dither(false).natural(false);
        let plain = run(base, &image, 2, 2).unwrap();
        assert!(plain.indices.iter().all(|&i| i == 2));

        let penalized = base.family_weights(FamilyWeights {
            concrete: 0.0,
            ..FamilyWeights::default()
        });
        let out = run(penalized, &image, 2, 2).unwrap();
        assert!(out.indices.iter().all(|&i| i != 2 && i != 3));
    }

    #[test]
    fn test_natural_phase_follows_bayer_row() {
        // Mid gray sits just above the black/white lightness midpoint; with
        // a full-strength phase the first Bayer row alternates its sign.
        let palette = ActivePalette::from_entries([
            PaletteEntry::new(Rgb::new(20, 21, 25), "minecraft:black_wool", "", "wool"),
            PaletteEntry::new(Rgb::new(233, 236, 236), "minecraft:white_wool", "", "wool"),
        ]);
        let prefs = PreferenceTable::new();
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
        let options = GuidedOptions {
            unsharp_amount: 0.0,
            ..GuidedOptions::new().use_dither(false).natural_strength(1.0)
        };
        let out = GuidedPipeline::new(options)
            .run(&[Rgb::new(128, 128, 128); 8], 8, 1, &matcher)
            .unwrap();
        assert_eq!(out.indices, vec![0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_edge_multiplier_bounds() {
        assert!((edge_multiplier(0.28, 0.28, 0.1) - 0.75).abs() < 1e-6);
        let m = edge_multiplier(0.0, 0.0, MIN_EDGE_SLOPE);
        assert!(m.is_finite() && (0.5..=1.0).contains(&m));
        assert!((edge_multiplier(1.0, 0.0, MIN_EDGE_SLOPE) - 0.5).abs() < 1e-6);
        assert!((edge_multiplier(0.0, 1.0, MIN_EDGE_SLOPE) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_edge_slope_keeps_error_finite() {
        // A flat image has a zero edge map, so threshold 0 and slope 0 would
        // divide zero by zero at every pixel.
        let options = GuidedOptions {
            edge_slope: 0.0,
            edge_threshold: 0.0,
            ..GuidedOptions::new()
        };
        let out = run(options, &[Rgb::new(120, 60, 30); 16], 4, 4).unwrap();
        assert_eq!(out.diagnostics.fallback_pixels, 0);
    }

    #[test]
    fn test_delta_hue_wraps() {
        assert!((delta_hue(3.0, -3.0) - (6.0 - 2.0 * PI)).abs() < 1e-6);
        assert!((delta_hue(-3.0, 3.0) + (6.0 - 2.0 * PI)).abs() < 1e-6);
        assert_eq!(delta_hue(0.5, 0.25), 0.25);
    }
}
