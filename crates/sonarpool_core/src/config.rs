//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Every section is optional; missing values fall back to the
//! defaults below.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = 42
//! deterministic = true
//!
//! [pool]
//! height = 12
//!
//! [source]
//! intensity = 1000.0
//! mode = "Enhanced"
//! x = 4
//! y = 7
//!
//! [navigator]
//! max_moves = 200
//!
//! [playback]
//! step_cooldown_ms = 150
//! ```

use crate::propagation::PropagationMode;
use serde::{Deserialize, Serialize};
use sonarpool_data::{Placement, Steps};

/// Pool geometry.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Pool height in cells. `None` builds one cell above the tallest terrain.
    pub height: Option<usize>,
}

/// Sound source strength, position and propagation mode.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub intensity: f64,
    pub mode: PropagationMode,
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub z: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            intensity: 1000.0,
            mode: PropagationMode::Enhanced,
            x: None,
            y: None,
            z: None,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// Navigator spawn position and move budget.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct NavigatorConfig {
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub z: Option<usize>,
    /// `None` moves until arrival.
    pub max_moves: Option<usize>,
}

impl NavigatorConfig {
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    #[must_use]
    pub fn steps(&self) -> Steps {
        self.max_moves.map_or(Steps::UntilArrival, Steps::Limited)
    }
}

/// Replay driver cooldowns, one per user action.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Minimum delay between two revealed trajectory points.
    pub step_cooldown_ms: u64,
    /// Minimum delay between two navigator respawns.
    pub respawn_cooldown_ms: u64,
    /// Navigators spawned by the replay loop, the first one included.
    pub navigators: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_cooldown_ms: 150,
            respawn_cooldown_ms: 500,
            navigators: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub pool: PoolConfig,
    pub source: SourceConfig,
    pub navigator: NavigatorConfig,
    pub playback: PlaybackConfig,
    pub seed: Option<u64>,
    pub deterministic: bool,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - Pool height, when given, must be positive and reasonable (<= 4096)
    /// - Source intensity must be finite and positive
    /// - A move budget, when given, must be positive
    /// - Deterministic runs need a seed
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(height) = self.pool.height {
            anyhow::ensure!(height > 0, "Pool height must be positive");
            anyhow::ensure!(height <= 4096, "Pool height too large (max 4096)");
        }

        anyhow::ensure!(
            self.source.intensity.is_finite() && self.source.intensity > 0.0,
            "Source intensity must be finite and positive"
        );

        anyhow::ensure!(
            self.navigator.max_moves != Some(0),
            "Navigator move budget must be positive"
        );

        anyhow::ensure!(
            self.playback.navigators > 0,
            "Playback must spawn at least one navigator"
        );
        anyhow::ensure!(
            self.playback.navigators <= 1000,
            "Too many navigators (max 1000)"
        );

        anyhow::ensure!(
            !self.deterministic || self.seed.is_some(),
            "Deterministic runs require a seed"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of the parameters that influence propagation and navigation.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.pool).as_bytes());
        hasher.update(format!("{:?}", self.source).as_bytes());
        hasher.update(format!("{:?}", self.navigator).as_bytes());
        hasher.update(format!("{:?}", self.seed).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_height_rejected() {
        let config = AppConfig {
            pool: PoolConfig { height: Some(0) },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_intensity_rejected() {
        for intensity in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = AppConfig {
                source: SourceConfig {
                    intensity,
                    ..Default::default()
                },
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{intensity} should be rejected");
        }
    }

    #[test]
    fn test_zero_move_budget_rejected() {
        let config = AppConfig {
            navigator: NavigatorConfig {
                max_moves: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deterministic_requires_seed() {
        let config = AppConfig {
            deterministic: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            seed = 7
            [source]
            mode = "Fast"
            x = 2
            y = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.source.mode, PropagationMode::Fast);
        assert_eq!(config.source.intensity, 1000.0);
        assert_eq!(config.source.placement(), Placement::column(2, 3));
        assert_eq!(config.navigator.steps(), Steps::UntilArrival);
        assert_eq!(config.playback.step_cooldown_ms, 150);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.source.intensity = 10.0;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
