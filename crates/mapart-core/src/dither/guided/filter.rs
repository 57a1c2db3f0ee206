//! Whole-plane filters over row-major `f32` channels.

use rayon::prelude::*;

/// Summed-area table with a zero top row and left column.
struct SummedArea {
    sums: Vec<f64>,
    stride: usize,
}

impl SummedArea {
    fn new(src: &[f32], width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0f64; stride * (height + 1)];

        // Row prefix sums are independent.
        sums.par_chunks_mut(stride)
            .skip(1)
            .zip(src.par_chunks(width))
            .for_each(|(row, line)| {
                let mut running = 0.0;
                for (x, &v) in line.iter().enumerate() {
                    running += v as f64;
                    row[x + 1] = running;
                }
            });

        for y in 2..=height {
            let (above, rest) = sums.split_at_mut(y * stride);
            let prev = &above[(y - 1) * stride..];
            for (cur, up) in rest[..stride].iter_mut().zip(prev) {
                *cur += up;
            }
        }

        Self { sums, stride }
    }

    /// Sum over the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    #[inline]
    fn rect(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let s = self.stride;
        self.sums[(y1 + 1) * s + x1 + 1] - self.sums[(y1 + 1) * s + x0] - self.sums[y0 * s + x1 + 1]
            + self.sums[y0 * s + x0]
    }
}

/// Mean over a `(2r+1)^2` window, clamped at the borders.
pub fn box_mean(src: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let sat = SummedArea::new(src, width, height);
    let mut out = vec![0.0f32; width * height];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        for (x, cell) in row.iter_mut().enumerate() {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(width - 1);
            let area = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
            *cell = (sat.rect(x0, y0, x1, y1) / area) as f32;
        }
    });
    out
}

fn box_mean_product(a: &[f32], b: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let product: Vec<f32> = a.iter().zip(b).map(|(x, y)| x * y).collect();
    box_mean(&product, width, height, radius)
}

fn variance(mean_i: &[f32], mean_ii: &[f32]) -> Vec<f32> {
    mean_i
        .iter()
        .zip(mean_ii)
        .map(|(m, mm)| (mm - m * m).max(0.0))
        .collect()
}

/// Self-guided filter on `plane`, in place.
///
/// `a = var / (var + eps)`, `b = mean - a * mean`, output
/// `mean(a) * I + mean(b)`.
pub fn guided_filter(plane: &mut [f32], width: usize, height: usize, radius: usize, eps: f32) {
    let mean_i = box_mean(plane, width, height, radius);
    let mean_ii = box_mean_product(plane, plane, width, height, radius);
    let var = variance(&mean_i, &mean_ii);

    let a: Vec<f32> = var
        .iter()
        .map(|&v| {
            let den = v + eps;
            if den > 1e-12 {
                v / den
            } else {
                0.0
            }
        })
        .collect();
    let b: Vec<f32> = a.iter().zip(&mean_i).map(|(a, m)| m - a * m).collect();

    let mean_a = box_mean(&a, width, height, radius);
    let mean_b = box_mean(&b, width, height, radius);
    for (i, v) in plane.iter_mut().enumerate() {
        *v = mean_a[i] * *v + mean_b[i];
    }
}

/// Filter `target` with `guide` as guidance, in place.
///
/// The per-pixel slope is clamped to `±slope_cap` so chroma is not
/// stretched by strong lightness structure.
pub fn guided_follow(
    guide: &[f32],
    target: &mut [f32],
    width: usize,
    height: usize,
    radius: usize,
    eps: f32,
    slope_cap: f32,
) {
    let mean_i = box_mean(guide, width, height, radius);
    let mean_p = box_mean(target, width, height, radius);
    let mean_ii = box_mean_product(guide, guide, width, height, radius);
    let mean_ip = box_mean_product(guide, target, width, height, radius);
    let var = variance(&mean_i, &mean_ii);

    let n = width * height;
    let mut a = vec![0.0f32; n];
    let mut b = vec![0.0f32; n];
    for i in 0..n {
        let cov = mean_ip[i] - mean_i[i] * mean_p[i];
        let den = var[i] + eps;
        let slope = if den > 1e-12 { cov / den } else { 0.0 };
        a[i] = slope.clamp(-slope_cap, slope_cap);
        b[i] = mean_p[i] - a[i] * mean_i[i];
    }

    let mean_a = box_mean(&a, width, height, radius);
    let mean_b = box_mean(&b, width, height, radius);
    for i in 0..n {
        target[i] = mean_a[i] * guide[i] + mean_b[i];
    }
}

/// Lightness unsharp mask, in place, clamped to 0..=1.
pub fn unsharp(plane: &mut [f32], width: usize, height: usize, amount: f32, radius: usize, passes: usize) {
    let mut blur = plane.to_vec();
    for _ in 0..passes {
        blur = box_mean(&blur, width, height, radius);
    }
    for (v, b) in plane.iter_mut().zip(&blur) {
        *v = (*v + amount * (*v - b)).clamp(0.0, 1.0);
    }
}

/// Sobel gradient magnitude normalized by its maximum, with clamped borders.
pub fn sobel_magnitude(plane: &[f32], width: usize, height: usize) -> Vec<f32> {
    let at = |x: isize, y: isize| {
        let cx = x.clamp(0, width as isize - 1) as usize;
        let cy = y.clamp(0, height as isize - 1) as usize;
        plane[cy * width + cx]
    };

    let mut out = vec![0.0f32; width * height];
    let mut max = 1e-8f32;
    for y in 0..height as isize {
        for x in 0..width as isize {
            let gx = -at(x - 1, y - 1) + at(x + 1, y - 1) - 2.0 * at(x - 1, y) + 2.0 * at(x + 1, y)
                - at(x - 1, y + 1)
                + at(x + 1, y + 1);
            let gy = -at(x - 1, y - 1) - 2.0 * at(x, y - 1) - at(x + 1, y - 1)
                + at(x - 1, y + 1)
                + 2.0 * at(x, y + 1)
                + at(x + 1, y + 1);
            let v = gx.hypot(gy);
            out[y as usize * width + x as usize] = v;
            max = max.max(v);
        }
    }

    let inv = 1.0 / max;
    for v in &mut out {
        *v *= inv;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_box_mean_constant_plane() {
        let plane = vec![0.25f32; 5 * 4];
        let out = box_mean(&plane, 5, 4, 2);
        assert!(out.iter().all(|&v| approx(v, 0.25)));
    }

    #[test]
    fn test_box_mean_clamps_window() {
        // 3x1 row [0, 3, 6]: corner windows only see two cells.
        let out = box_mean(&[0.0, 3.0, 6.0], 3, 1, 1);
        assert!(approx(out[0], 1.5));
        assert!(approx(out[1], 3.0));
        assert!(approx(out[2], 4.5));
    }

    #[test]
    fn test_box_mean_2d() {
        let plane: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let out = box_mean(&plane, 3, 3, 1);
        assert!(approx(out[4], 4.0));
        assert!(approx(out[0], (0.0 + 1.0 + 3.0 + 4.0) / 4.0));
    }

    #[test]
    fn test_guided_filter_keeps_flat_plane() {
        let mut plane = vec![0.5f32; 16];
        guided_filter(&mut plane, 4, 4, 1, 5e-3);
        assert!(plane.iter().all(|&v| approx(v, 0.5)));
    }

    #[test]
    fn test_guided_filter_preserves_strong_edge() {
        let mut plane: Vec<f32> = (0..8 * 8).map(|i| if i % 8 < 4 { 0.1 } else { 0.9 }).collect();
        let before = plane.clone();
        guided_filter(&mut plane, 8, 8, 1, 1e-4);
        for (a, b) in plane.iter().zip(&before) {
            assert!((a - b).abs() < 0.02, "{a} vs {b}");
        }
    }

    #[test]
    fn test_follow_slope_is_capped() {
        let guide = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let target: Vec<f32> = guide.iter().map(|v| v * 5.0).collect();

        let mut free = target.clone();
        guided_follow(&guide, &mut free, 8, 1, 1, 1e-6, 100.0);
        assert!((free[3] - 5.0).abs() < 1e-3, "uncapped peak {}", free[3]);

        let mut capped = target;
        guided_follow(&guide, &mut capped, 8, 1, 1, 1e-6, 0.6);
        assert!(capped[3] < free[3] - 1.0, "capped peak {}", capped[3]);
    }

    #[test]
    fn test_unsharp_clamps() {
        let mut plane = vec![0.0, 0.0, 1.0, 1.0];
        unsharp(&mut plane, 4, 1, 5.0, 1, 2);
        assert!(plane.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(plane[0], 0.0);
        assert_eq!(plane[3], 1.0);
    }

    #[test]
    fn test_sobel_normalized() {
        let plane: Vec<f32> = (0..6 * 6).map(|i| if i % 6 < 3 { 0.0 } else { 1.0 }).collect();
        let edge = sobel_magnitude(&plane, 6, 6);
        let max = edge.iter().cloned().fold(0.0f32, f32::max);
        assert!(approx(max, 1.0));
        assert_eq!(edge[0], 0.0);
        assert!(edge[2] > 0.9);
    }

    #[test]
    fn test_sobel_flat_is_zero() {
        let edge = sobel_magnitude(&[0.3; 9], 3, 3);
        assert!(edge.iter().all(|&v| v == 0.0));
    }
}
