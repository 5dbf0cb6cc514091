use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer voxel coordinates inside a pool.
///
/// `x` runs along the pool length, `y` along its width and `z` upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Per-axis absolute distance to `other`.
    #[inline]
    #[must_use]
    pub fn axis_delta(&self, other: &Coord) -> (usize, usize, usize) {
        (
            self.x.abs_diff(other.x),
            self.y.abs_diff(other.y),
            self.z.abs_diff(other.z),
        )
    }

    /// Manhattan distance projected onto the XY plane.
    #[inline]
    #[must_use]
    pub fn xy_manhattan(&self, other: &Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    #[must_use]
    pub fn manhattan(&self, other: &Coord) -> usize {
        let (dx, dy, dz) = self.axis_delta(other);
        dx + dy + dz
    }

    #[inline]
    #[must_use]
    pub fn euclidean(&self, other: &Coord) -> f64 {
        let (dx, dy, dz) = self.axis_delta(other);
        ((dx * dx + dy * dy + dz * dz) as f64).sqrt()
    }

    /// Applies a signed offset, returning `None` when any axis would go negative.
    #[inline]
    #[must_use]
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Coord> {
        Some(Coord {
            x: self.x.checked_add_signed(dx as isize)?,
            y: self.y.checked_add_signed(dy as isize)?,
            z: self.z.checked_add_signed(dz as isize)?,
        })
    }
}

impl From<(usize, usize, usize)> for Coord {
    fn from((x, y, z): (usize, usize, usize)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
