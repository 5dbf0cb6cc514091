//! # Sonarpool Core
//!
//! Sound propagation through a voxel pool with an uneven floor, and the
//! greedy navigators that listen for it.
//!
//! This crate contains:
//! - The pool grid with precomputed 26-neighbor adjacency
//! - Enhanced and fast path tracing around terrain
//! - Layer-parallel intensity propagation from a single source
//! - Gradient-ascent navigators
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use sonarpool_core::{Pool, PropagationMode};
//! use sonarpool_data::{Coord, HeightField, Placement};
//!
//! let field = HeightField::flat(3, 3, 0).unwrap();
//! let mut pool = Pool::new(&field, 3).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! pool.place_source(Placement::at(1, 1, 1), 1000.0, PropagationMode::Enhanced, &mut rng)
//!     .unwrap();
//!
//! let corner = pool.intensity(Coord::new(0, 0, 0)).unwrap().unwrap();
//! assert!((corner - 1000.0 / 3.0).abs() < 1e-6);
//! ```

/// Neighbor offsets and dense grid indexing
pub mod adjacency;
/// Configuration management and validation
pub mod config;
/// Simulation error types
pub mod error;
/// Medium traits used by propagation and rendering
pub mod medium;
/// Performance metrics collection and logging
pub mod metrics;
/// Gradient-ascent navigators
pub mod navigator;
/// Pool grid, source placement and obstacle bounds
pub mod pool;
/// Path tracing and intensity propagation
pub mod propagation;

pub use config::AppConfig;
pub use error::{Result, SimError};
pub use medium::MediumLogic;
pub use metrics::{init_logging, Metrics};
pub use navigator::Navigator;
pub use pool::{ObstacleBound, Pool, PoolSummary, SoundSource};
pub use propagation::{PathTracer, Polyline, PropagationMode, PropagationReport};
