//! Moore-neighborhood adjacency between voxels.
//!
//! The offset order below is normative: navigator tie-breaks and therefore
//! trajectories depend on it.

use sonarpool_data::{Coord, NEIGHBOR_COUNT};

/// The 26 neighbor offsets as `(dx, dy, dz)`.
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); NEIGHBOR_COUNT] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
    (0, 1, 0),
    (0, -1, 0),
    (1, 0, -1),
    (1, 0, 1),
    (1, 1, 0),
    (1, -1, 0),
    (-1, 0, -1),
    (-1, 0, 1),
    (-1, 1, 0),
    (-1, -1, 0),
    (0, 1, -1),
    (0, 1, 1),
    (0, -1, 1),
    (0, -1, -1),
    (1, 1, -1),
    (1, 1, 1),
    (1, -1, 1),
    (1, -1, -1),
    (-1, 1, -1),
    (-1, 1, 1),
    (-1, -1, 1),
    (-1, -1, -1),
];

/// Index of the offset pointing back along `NEIGHBOR_OFFSETS[slot]`.
#[must_use]
pub fn opposite_slot(slot: usize) -> usize {
    let (dx, dy, dz) = NEIGHBOR_OFFSETS[slot];
    NEIGHBOR_OFFSETS
        .iter()
        .position(|&o| o == (-dx, -dy, -dz))
        .unwrap_or(slot)
}

/// Pool extents used to resolve neighbors without touching cell storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub length: usize,
    pub width: usize,
    pub height: usize,
}

impl Extent {
    #[inline]
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.length && c.y < self.width && c.z < self.height
    }

    /// Flat z-major index: `z * (length * width) + y * length + x`.
    #[inline]
    #[must_use]
    pub fn index(&self, c: Coord) -> usize {
        c.z * self.length * self.width + c.y * self.length + c.x
    }

    #[inline]
    #[must_use]
    pub fn coord(&self, idx: usize) -> Coord {
        let slice = self.length * self.width;
        let z = idx / slice;
        let rem = idx % slice;
        Coord::new(rem % self.length, rem / self.length, z)
    }

    #[must_use]
    pub fn volume(&self) -> usize {
        self.length * self.width * self.height
    }

    /// Resolves every offset of `c` to a flat index, `None` outside the pool.
    #[must_use]
    pub fn neighbors_of(&self, c: Coord) -> [Option<u32>; NEIGHBOR_COUNT] {
        let mut out = [None; NEIGHBOR_COUNT];
        for (slot, &(dx, dy, dz)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            out[slot] = c
                .offset(dx, dy, dz)
                .filter(|n| self.contains(*n))
                .map(|n| self.index(n) as u32);
        }
        out
    }
}
