//! Classic error diffusion on a full-image float working buffer.

use super::kernel::{Kernel, ATKINSON, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE};
use super::natural::local_strength;
use super::{Dither, Dithered, DitherOptions};
use crate::color::{LabCache, Rgb};
use crate::matcher::NearestColorMatcher;
use crate::output::Diagnostics;

/// Error diffusion parameterized by kernel.
///
/// Scans left to right, top to bottom. Each pixel of the working buffer is
/// matched by Euclidean sRGB distance, replaced by the matched color, and
/// its error `old - new` is pushed to the kernel taps, scaled by the local
/// strength when natural mode is on. Neighbor channels are clamped to
/// 0..=255 after every write; taps outside the image are dropped.
pub fn dither_with_kernel(
    image: &[Rgb],
    width: usize,
    height: usize,
    matcher: &NearestColorMatcher<'_>,
    options: &DitherOptions,
    kernel: &Kernel,
) -> Dithered {
    let mut work: Vec<[f32; 3]> = image.iter().map(|c| c.to_f32()).collect();
    let mut indices = vec![0u16; width * height];
    let mut mask = options.natural.then(|| vec![0.0f32; width * height]);
    let ratio = options.strength_ratio();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = work[idx];
            let m = matcher.find_nearest_srgb(old);
            indices[idx] = m.index as u16;

            let new = matcher.palette().entries()[m.index].rgb.to_f32();
            let error = [old[0] - new[0], old[1] - new[1], old[2] - new[2]];
            work[idx] = new;

            let strength = match mask.as_mut() {
                Some(mask) => {
                    let s = local_strength(&work, width, height, x, y) * ratio;
                    mask[idx] = s;
                    s
                }
                None => 1.0,
            };

            for (dx, dy, fraction) in kernel.taps() {
                let nx = x as i64 + dx as i64;
                let ny = y as i64 + dy as i64;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let target = &mut work[ny as usize * width + nx as usize];
                let scale = fraction * strength;
                for c in 0..3 {
                    target[c] = (target[c] + error[c] * scale).clamp(0.0, 255.0);
                }
            }
        }
    }

    tracing::trace!(width, height, natural = options.natural, "Error diffusion complete");

    Dithered {
        indices,
        diagnostics: Diagnostics {
            strength_mask: mask,
            ..Default::default()
        },
    }
}

macro_rules! kernel_dither {
    ($(#[$meta:meta])* $name:ident, $kernel:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Dither for $name {
            fn dither(
                &self,
                image: &[Rgb],
                width: usize,
                height: usize,
                matcher: &NearestColorMatcher<'_>,
                _cache: &mut LabCache,
                options: &DitherOptions,
            ) -> Dithered {
                dither_with_kernel(image, width, height, matcher, options, &$kernel)
            }
        }
    };
}

kernel_dither!(
    /// Floyd-Steinberg: 7/16 right, 3/16 below-left, 5/16 below, 1/16 below-right.
    FloydSteinberg,
    FLOYD_STEINBERG
);

kernel_dither!(
    /// Jarvis-Judice-Ninke: 12 taps over two following rows.
    JarvisJudiceNinke,
    JARVIS_JUDICE_NINKE
);

kernel_dither!(
    /// Atkinson: six 1/8 taps, a quarter of the error is discarded.
    Atkinson,
    ATKINSON
);
