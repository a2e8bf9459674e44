//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tile-spawning settings for an engine.
///
/// Grid dimensions are not part of the config; they are fixed per engine
/// and passed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tiles spawned on construction and on every reset
    pub initial_tiles: usize,
    /// Chance that a spawned tile is a 4 instead of a 2
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_tiles: 2,
            four_probability: 0.1,
        }
    }
}

impl EngineConfig {
    pub fn with_initial_tiles(mut self, initial_tiles: usize) -> Self {
        self.initial_tiles = initial_tiles;
        self
    }

    pub fn with_four_probability(mut self, four_probability: f64) -> Self {
        self.four_probability = four_probability;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.four_probability.is_finite() || !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "four_probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_tiles, 2);
        assert_eq!(config.four_probability, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(r#"{ "four_probability": 0.25 }"#).unwrap();
        assert_eq!(config.initial_tiles, 2);
        assert_eq!(config.four_probability, 0.25);
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(EngineConfig::from_json(r#"{ "four_probability": 1.5 }"#).is_err());
        assert!(EngineConfig::default()
            .with_four_probability(f64::NAN)
            .validate()
            .is_err());
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
