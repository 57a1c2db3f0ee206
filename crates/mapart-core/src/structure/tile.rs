/// Largest footprint along X or Z that one structure file may cover.
pub const MAX_EXTENT: usize = 64;

/// One sub-rectangle of the output footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Tile column.
    pub tx: usize,
    /// Tile row.
    pub tz: usize,
    /// Output X of the tile origin.
    pub x0: usize,
    /// Output Z of the tile origin.
    pub z0: usize,
    pub width: usize,
    pub depth: usize,
}

impl Tile {
    pub fn cells(&self) -> usize {
        self.width * self.depth
    }
}

/// Split of an output footprint into tiles of at most `max_extent` per axis.
///
/// Tiles are ordered row by row (`tz` outer, `tx` inner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlan {
    tiles_x: usize,
    tiles_z: usize,
    tiles: Vec<Tile>,
}

impl TilePlan {
    /// # Panics
    ///
    /// Panics if `max_extent` is zero.
    pub fn new(out_w: usize, out_h: usize, max_extent: usize) -> Self {
        assert!(max_extent > 0, "max_extent must be positive");
        let tiles_x = out_w.div_ceil(max_extent);
        let tiles_z = out_h.div_ceil(max_extent);
        let mut tiles = Vec::with_capacity(tiles_x * tiles_z);
        for tz in 0..tiles_z {
            for tx in 0..tiles_x {
                let x0 = tx * max_extent;
                let z0 = tz * max_extent;
                tiles.push(Tile {
                    tx,
                    tz,
                    x0,
                    z0,
                    width: max_extent.min(out_w - x0),
                    depth: max_extent.min(out_h - z0),
                });
            }
        }
        Self { tiles_x, tiles_z, tiles }
    }

    pub fn tiles_x(&self) -> usize {
        self.tiles_x
    }

    pub fn tiles_z(&self) -> usize {
        self.tiles_z
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
