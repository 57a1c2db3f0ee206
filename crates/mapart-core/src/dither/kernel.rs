//! Error diffusion kernels.
//!
//! Each kernel lists `(dx, dy, weight)` taps for the not-yet-visited
//! neighbors of the current pixel; a tap receives `error * weight / divisor`.

/// An error diffusion kernel.
///
/// The total error propagated is `sum(weights) / divisor`. Floyd-Steinberg and
/// Jarvis-Judice-Ninke propagate all of it; Atkinson deliberately drops a
/// quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// `(dx, dy, weight)`; `dy` is never negative.
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
}

impl Kernel {
    /// Taps as `(dx, dy, fraction)`.
    pub fn taps(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let divisor = self.divisor as f32;
        self.entries
            .iter()
            .map(move |&(dx, dy, w)| (dx, dy, w as f32 / divisor))
    }

    /// Share of the error the kernel propagates.
    pub fn total_fraction(&self) -> f32 {
        self.entries.iter().map(|&(_, _, w)| w as u32).sum::<u32>() as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg, four taps, 16/16.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
};

/// Jarvis-Judice-Ninke, twelve taps over three rows, 48/48.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
};

/// Atkinson, six taps, 6/8. The missing quarter of the error is discarded.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
};
