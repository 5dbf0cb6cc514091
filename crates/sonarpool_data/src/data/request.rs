use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested position for a source or navigator.
///
/// Missing or out-of-range axes are chosen by the placement routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub z: Option<usize>,
}

impl Placement {
    /// Let the placement routine choose every axis.
    #[must_use]
    pub const fn random() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
        }
    }

    #[must_use]
    pub const fn column(x: usize, y: usize) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    #[must_use]
    pub const fn at(x: usize, y: usize, z: usize) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }
}

/// Move budget for a navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steps {
    /// At most this many moves. Zero is rejected by the navigator.
    Limited(usize),
    /// Keep moving until a local intensity maximum is reached.
    #[default]
    UntilArrival,
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Steps::Limited(n) => write!(f, "{n}"),
            Steps::UntilArrival => write!(f, "all"),
        }
    }
}

/// Parse failure for [`Steps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStepsError(pub String);

impl fmt::Display for ParseStepsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid step count '{}': expected a positive integer or 'all'",
            self.0
        )
    }
}

impl std::error::Error for ParseStepsError {}

impl FromStr for Steps {
    type Err = ParseStepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "arrival" | "until-arrival" => Ok(Steps::UntilArrival),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Steps::Limited(n)),
                _ => Err(ParseStepsError(s.to_string())),
            },
        }
    }
}
