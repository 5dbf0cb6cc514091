use serde::{Deserialize, Serialize};

/// Terrain elevation over the pool footprint.
///
/// Stored row-major with one row per `y`: `heights[y * length + x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightField {
    length: usize,
    width: usize,
    heights: Vec<u32>,
}

impl HeightField {
    /// Builds a field from flat row-major data.
    pub fn new(length: usize, width: usize, heights: Vec<u32>) -> anyhow::Result<Self> {
        anyhow::ensure!(length > 0, "Height field length must be positive");
        anyhow::ensure!(width > 0, "Height field width must be positive");
        anyhow::ensure!(
            heights.len() == length * width,
            "Height field holds {} values, expected {}x{}",
            heights.len(),
            length,
            width
        );
        Ok(Self {
            length,
            width,
            heights,
        })
    }

    /// Builds a field from rows, one row per `y`, each `length` values long.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> anyhow::Result<Self> {
        let width = rows.len();
        let length = rows.first().map_or(0, Vec::len);
        anyhow::ensure!(
            rows.iter().all(|row| row.len() == length),
            "Height field rows must all have the same length"
        );
        Self::new(length, width, rows.into_iter().flatten().collect())
    }

    /// A field with the same elevation everywhere.
    pub fn flat(length: usize, width: usize, elevation: u32) -> anyhow::Result<Self> {
        Self::new(length, width, vec![elevation; length * width])
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.heights[y * self.length + x]
    }

    #[must_use]
    pub fn max_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.heights
            .chunks(self.length)
            .map(<[u32]>::to_vec)
            .collect()
    }
}
