use super::blue_noise::ThresholdMatrix;
use super::{Dither, Dithered, DitherOptions};
use crate::color::{LabCache, Rgb};
use crate::matcher::NearestColorMatcher;
use crate::output::Diagnostics;

/// Weight of the threshold offset in the luminance decision.
///
/// Zero: the threshold is looked up but does not move any pixel, so the
/// result equals direct matching. Kept at zero for output compatibility.
pub const ORDERED_THRESHOLD_WEIGHT: f32 = 0.0;

/// Ordered lookup against a tileable threshold matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedBlueNoise {
    pub matrix: ThresholdMatrix,
}

impl OrderedBlueNoise {
    pub fn new(matrix: ThresholdMatrix) -> Self {
        Self { matrix }
    }
}

impl Dither for OrderedBlueNoise {
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        matcher: &NearestColorMatcher<'_>,
        cache: &mut LabCache,
        options: &DitherOptions,
    ) -> Dithered {
        let mut indices = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let src = image[y * width + x];
                let offset = self.matrix.centered(x, y) * 255.0 * ORDERED_THRESHOLD_WEIGHT;
                let biased = if offset == 0.0 {
                    src
                } else {
                    let [r, g, b] = src.to_f32();
                    Rgb::from_f32_clamped([r + offset, g + offset, b + offset])
                };
                indices.push(matcher.find_nearest(biased, cache).index as u16);
            }
        }

        Dithered {
            indices,
            diagnostics: Diagnostics {
                strength_mask: options.natural.then(|| vec![0.0; width * height]),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::Direct;
    use crate::palette::{assemble, GroupWeights, PreferenceTable, SourceSelection};

    #[test]
    fn test_ordered_matches_direct() {
        let mut cache = LabCache::new();
        let palette = assemble(&SourceSelection::default(), &[], &[], &mut cache);
        let prefs = PreferenceTable::new();
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);

        let (w, h) = (20, 18);
        let image: Vec<Rgb> = (0..w * h)
            .map(|i| Rgb::new((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8))
            .collect();
        let options = DitherOptions::new();

        for matrix in [ThresholdMatrix::BlueNoise, ThresholdMatrix::Bayer] {
            let ordered = OrderedBlueNoise::new(matrix).dither(&image, w, h, &matcher, &mut cache, &options);
            let direct = Direct.dither(&image, w, h, &matcher, &mut cache, &options);
            assert_eq!(ordered.indices, direct.indices);
        }
    }

    #[test]
    fn test_natural_mask_is_zero() {
        let mut cache = LabCache::new();
        let palette = assemble(&SourceSelection::default(), &[], &[], &mut cache);
        let prefs = PreferenceTable::new();
        let groups = GroupWeights::new();
        let matcher = NearestColorMatcher::new(&palette, &prefs, &groups);
        let image = vec![Rgb::new(50, 60, 70); 6];

        let out = OrderedBlueNoise::default().dither(
            &image,
            3,
            2,
            &matcher,
            &mut cache,
            &DitherOptions::new().natural(true),
        );
        assert_eq!(out.diagnostics.strength_mask, Some(vec![0.0; 6]));
    }
}
