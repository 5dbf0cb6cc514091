//! Driver layer for the sonarpool simulation: replay sessions and text
//! rendering on top of `sonarpool_core`.

pub mod app;
