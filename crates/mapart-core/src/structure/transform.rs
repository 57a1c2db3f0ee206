//! Output-to-source coordinate mapping.

/// Orientation of the exported footprint relative to the source raster.
///
/// Applied as an inverse mapping: for every output cell the exporter asks
/// which source cell it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// Rotate 90 degrees clockwise.
    pub rotate_cw: bool,
    /// Mirror the output along X after rotation.
    pub mirror_x: bool,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rotate_cw: false,
        mirror_x: false,
    };

    /// Layout of Bedrock exports.
    pub const BEDROCK: Orientation = Orientation {
        rotate_cw: true,
        mirror_x: true,
    };

    /// Output `(width, depth)` for a `src_w` x `src_h` source.
    pub fn output_size(self, src_w: usize, src_h: usize) -> (usize, usize) {
        if self.rotate_cw {
            (src_h, src_w)
        } else {
            (src_w, src_h)
        }
    }

    /// Source cell `(x, z)` shown at output cell `(ax, az)`, or `None` when
    /// the output cell lies outside the source.
    pub fn source_of(self, ax: usize, az: usize, src_w: usize, src_h: usize) -> Option<(usize, usize)> {
        let (out_w, out_h) = self.output_size(src_w, src_h);
        if ax >= out_w || az >= out_h {
            return None;
        }
        let x_out = if self.mirror_x { out_w - 1 - ax } else { ax };
        let (sx, sz) = if self.rotate_cw {
            (az, src_h - 1 - x_out)
        } else {
            (x_out, az)
        };
        (sx < src_w && sz < src_h).then_some((sx, sz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity() {
        assert_eq!(Orientation::IDENTITY.source_of(2, 1, 3, 2), Some((2, 1)));
        assert_eq!(Orientation::IDENTITY.source_of(3, 0, 3, 2), None);
    }

    #[test]
    fn test_rotation_clockwise() {
        let rot = Orientation {
            rotate_cw: true,
            mirror_x: false,
        };
        // 3 wide, 2 tall source: the bottom-left cell lands top-left.
        assert_eq!(rot.output_size(3, 2), (2, 3));
        assert_eq!(rot.source_of(0, 0, 3, 2), Some((0, 1)));
        assert_eq!(rot.source_of(1, 0, 3, 2), Some((0, 0)));
        assert_eq!(rot.source_of(0, 2, 3, 2), Some((2, 1)));
    }

    #[test]
    fn test_bedrock_layout_is_transpose() {
        // Rotating clockwise then mirroring X swaps the axes.
        for (ax, az) in [(0, 0), (1, 2), (1, 0)] {
            assert_eq!(Orientation::BEDROCK.source_of(ax, az, 3, 2), Some((az, ax)));
        }
    }

    #[test]
    fn test_mapping_is_a_bijection() {
        for o in [
            Orientation::IDENTITY,
            Orientation::BEDROCK,
            Orientation {
                rotate_cw: true,
                mirror_x: false,
            },
            Orientation {
                rotate_cw: false,
                mirror_x: true,
            },
        ] {
            let (w, h) = (5, 3);
            let (ow, oh) = o.output_size(w, h);
            let mut seen = HashSet::new();
            for az in 0..oh {
                for ax in 0..ow {
                    let src = o.source_of(ax, az, w, h).expect("in bounds");
                    assert!(seen.insert(src), "{o:?} maps two cells to {src:?}");
                }
            }
            assert_eq!(seen.len(), w * h);
        }
    }
}
