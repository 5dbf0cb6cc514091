use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sonarpool_core::{Pool, PropagationMode};
use sonarpool_data::{HeightField, Placement};
use std::sync::Arc;

#[allow(dead_code)]
pub struct PoolBuilder {
    rows: Vec<Vec<u32>>,
    height: Option<usize>,
    source: Option<(Placement, f64, PropagationMode)>,
    seed: u64,
}

#[allow(dead_code)]
impl PoolBuilder {
    pub fn flat(length: usize, width: usize) -> Self {
        Self::from_rows(vec![vec![0; length]; width])
    }

    pub fn from_rows(rows: Vec<Vec<u32>>) -> Self {
        Self {
            rows,
            height: None,
            source: None,
            seed: 42,
        }
    }

    pub fn with_height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_elevation(mut self, x: usize, y: usize, elevation: u32) -> Self {
        self.rows[y][x] = elevation;
        self
    }

    pub fn with_source(mut self, placement: Placement, intensity: f64, mode: PropagationMode) -> Self {
        self.source = Some((placement, intensity, mode));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn field(&self) -> HeightField {
        HeightField::from_rows(self.rows.clone()).expect("Invalid height field in test builder")
    }

    pub fn build(self) -> Pool {
        let field = self.field();
        let mut pool = match self.height {
            Some(height) => Pool::new(&field, height),
            None => Pool::with_headroom(&field),
        }
        .expect("Failed to create pool in test builder");

        if let Some((placement, intensity, mode)) = self.source {
            let mut rng = rng(self.seed);
            pool.place_source(placement, intensity, mode, &mut rng)
                .expect("Failed to place source in test builder");
        }
        pool
    }

    pub fn build_shared(self) -> Arc<Pool> {
        Arc::new(self.build())
    }
}

/// 3×3×3 water cube with a 1000-strong source in the middle.
#[allow(dead_code)]
pub fn cube(mode: PropagationMode) -> Arc<Pool> {
    PoolBuilder::flat(3, 3)
        .with_height(3)
        .with_source(Placement::at(1, 1, 1), 1000.0, mode)
        .build_shared()
}

/// 5×3 pool split by a two-cell-high wall at `x = 2`.
#[allow(dead_code)]
pub fn walled() -> PoolBuilder {
    PoolBuilder::from_rows(vec![vec![0, 0, 2, 0, 0]; 3]).with_height(4)
}

#[allow(dead_code)]
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
