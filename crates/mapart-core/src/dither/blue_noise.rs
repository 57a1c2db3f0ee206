//! Tileable threshold matrices.
//!
//! [`BLUE_NOISE_16`] is a 16x16 permutation of 0..=255 built at compile time
//! by ranking a hashed value per cell; [`bayer_8`] reads the classic 8x8
//! Bayer matrix rescaled to 0..=255.

/// 16x16 tileable noise, every value 0..=255 exactly once.
#[rustfmt::skip]
pub const BLUE_NOISE_16: [[u8; 16]; 16] = generate_blue_noise();

const fn cell_hash(idx: usize) -> u32 {
    let x = (idx % 16) as u32;
    let y = (idx / 16) as u32;
    let mut hash = idx as u32;
    hash = hash.wrapping_mul(0x85ebca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2ae35);
    hash ^= hash >> 16;
    hash = hash.wrapping_add(x.wrapping_mul(0x45d9f3b));
    hash ^= hash >> 11;
    hash = hash.wrapping_add(y.wrapping_mul(0x119de1f3));
    hash ^= hash >> 15;
    hash = hash.wrapping_mul(0x27d4eb2d);
    hash ^= hash >> 13;
    hash
}

/// Rank every cell's hash among all 256; ties break by cell index, so the
/// ranks form a permutation.
const fn generate_blue_noise() -> [[u8; 16]; 16] {
    const N: usize = 256;
    let mut hashes = [0u32; N];
    let mut i = 0;
    while i < N {
        hashes[i] = cell_hash(i);
        i += 1;
    }

    let mut result = [[0u8; 16]; 16];
    let mut i = 0;
    while i < N {
        let mut rank = 0usize;
        let mut j = 0;
        while j < N {
            if hashes[j] < hashes[i] || (hashes[j] == hashes[i] && j < i) {
                rank += 1;
            }
            j += 1;
        }
        result[i / 16][i % 16] = rank as u8;
        i += 1;
    }
    result
}

#[rustfmt::skip]
const BAYER_8_RAW: [[u8; 8]; 8] = [
    [0, 48, 12, 60, 3, 51, 15, 63],
    [32, 16, 44, 28, 35, 19, 47, 31],
    [8, 56, 4, 52, 11, 59, 7, 55],
    [40, 24, 36, 20, 43, 27, 39, 23],
    [2, 50, 14, 62, 1, 49, 13, 61],
    [34, 18, 46, 30, 33, 17, 45, 29],
    [10, 58, 6, 54, 9, 57, 5, 53],
    [42, 26, 38, 22, 41, 25, 37, 21],
];

/// Bayer value at a cell, scaled by 255/63 onto 0..=255.
#[inline]
pub fn bayer_8(x: usize, y: usize) -> f32 {
    BAYER_8_RAW[y % 8][x % 8] as f32 * (255.0 / 63.0)
}

/// Which tileable matrix a policy reads its per-pixel threshold from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMatrix {
    #[default]
    BlueNoise,
    Bayer,
}

impl ThresholdMatrix {
    /// Threshold on the 0..=255 scale for pixel `(x, y)`, tiled.
    #[inline]
    pub fn at(self, x: usize, y: usize) -> f32 {
        match self {
            ThresholdMatrix::BlueNoise => BLUE_NOISE_16[y % 16][x % 16] as f32,
            ThresholdMatrix::Bayer => bayer_8(x, y),
        }
    }

    /// Threshold recentered to roughly -0.5..=0.5.
    #[inline]
    pub fn centered(self, x: usize, y: usize) -> f32 {
        (self.at(x, y) - 128.0) / 255.0
    }
}
