//! Core data structures for the sonarpool simulation.

pub mod cell;
pub mod coord;
pub mod heightfield;
pub mod request;
