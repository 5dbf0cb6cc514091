//! # Sonarpool IO
//!
//! Input and output around the simulation core.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Heightmap decoding from images, JSON rows and plain-text grids
//! - JSON serialization helpers
//! - Trajectory records for exporting navigator runs

/// Error types and result aliases for I/O operations
pub mod error;
/// Terrain heightmap decoding
pub mod heightmap;
/// Exported navigator trajectories
pub mod record;
/// Validated serialization helpers for JSON
pub mod serialization;

pub use error::{IoError, Result};
pub use heightmap::{load_heightmap, parse_grid};
pub use record::TrajectoryRecord;
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
