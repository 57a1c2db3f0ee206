//! Local-contrast modulation of diffusion strength.

use crate::color::Rgb;

/// Lowest strength the modulation can produce.
pub const MIN_STRENGTH: f32 = 0.2;

/// Luma contrast that maps to zero strength before clamping.
const CONTRAST_SCALE: f32 = 40.0;

/// Diffusion strength for pixel `(x, y)` of a working buffer.
///
/// Reads the luma of the in-bounds 8-neighborhood:
/// `clamp(1 - (stddev + max |neighbor - center|) / 40, 0.2, 1.0)`.
/// A pixel with no neighbors gets full strength.
pub fn local_strength(work: &[[f32; 3]], width: usize, height: usize, x: usize, y: usize) -> f32 {
    let center = Rgb::luma(work[y * width + x]);
    let mut lumas = [0.0f32; 8];
    let mut n = 0;

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            lumas[n] = Rgb::luma(work[ny as usize * width + nx as usize]);
            n += 1;
        }
    }

    if n == 0 {
        return 1.0;
    }

    let lumas = &lumas[..n];
    let mean = lumas.iter().sum::<f32>() / n as f32;
    let variance = lumas.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n as f32;
    let gradient = lumas.iter().fold(0.0f32, |m, v| m.max((v - center).abs()));

    (1.0 - (variance.sqrt() + gradient) / CONTRAST_SCALE).clamp(MIN_STRENGTH, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_region_full_strength() {
        let work = vec![[100.0, 100.0, 100.0]; 9];
        assert_eq!(local_strength(&work, 3, 3, 1, 1), 1.0);
    }

    #[test]
    fn test_strong_edge_floors_at_minimum() {
        let mut work = vec![[0.0, 0.0, 0.0]; 9];
        for x in 0..3 {
            work[x] = [255.0, 255.0, 255.0];
        }
        assert_eq!(local_strength(&work, 3, 3, 1, 1), MIN_STRENGTH);
    }

    #[test]
    fn test_mild_contrast_in_between() {
        let mut work = vec![[100.0, 100.0, 100.0]; 9];
        work[0] = [110.0, 110.0, 110.0];
        let s = local_strength(&work, 3, 3, 1, 1);
        assert!(s > MIN_STRENGTH && s < 1.0, "s = {s}");
    }

    #[test]
    fn test_single_pixel_has_no_neighbors() {
        let work = vec![[5.0, 5.0, 5.0]];
        assert_eq!(local_strength(&work, 1, 1, 0, 0), 1.0);
    }
}
