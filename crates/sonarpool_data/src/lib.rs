//! # Sonarpool Data
//!
//! Plain data types shared by every sonarpool crate: voxel coordinates,
//! cell media, elevation fields and the request types used to place sources
//! and navigators. Behavior lives in `sonarpool_core`.

pub mod data;

pub use data::cell::{Cell, Medium, NEIGHBOR_COUNT};
pub use data::coord::Coord;
pub use data::heightfield::HeightField;
pub use data::request::{Placement, Steps};
