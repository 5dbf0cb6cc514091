//! Error types for the simulation core.
//!
//! Every failure is raised synchronously by the call that detects it and is
//! never retried internally.

use sonarpool_data::Coord;
use thiserror::Error;

/// Main error type for pool construction, propagation and navigation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// The pool cannot be built with the requested parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Intensity or path length requested for a cell that is not water.
    #[error("Invalid target {0}: sound intensity is only defined for water cells")]
    InvalidTarget(Coord),

    /// Malformed argument, such as a zero step budget.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Coordinates outside the pool.
    #[error("Coordinates {0} are outside the pool")]
    OutOfBounds(Coord),

    /// The operation needs a placed and propagated sound source.
    #[error("No sound source has been placed in the pool")]
    MissingSource,

    /// A pool supports one source at a time.
    #[error("A sound source is already placed at {0}")]
    SourceAlreadyPlaced(Coord),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    #[must_use]
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
