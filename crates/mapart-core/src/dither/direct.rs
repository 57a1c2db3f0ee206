use super::{Dither, Dithered, DitherOptions};
use crate::color::{LabCache, Rgb};
use crate::matcher::NearestColorMatcher;

/// Independent perceptual nearest match per pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl Dither for Direct {
    fn dither(
        &self,
        image: &[Rgb],
        _width: usize,
        _height: usize,
        matcher: &NearestColorMatcher<'_>,
        cache: &mut LabCache,
        _options: &DitherOptions,
    ) -> Dithered {
        let indices = image
            .iter()
            .map(|&rgb| matcher.find_nearest(rgb, cache).index as u16)
            .collect();
        Dithered {
            indices,
            ..Default::default()
        }
    }
}
