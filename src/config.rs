//! Equalizer configuration files
//!
//! A config is a JSON document holding a band layout and a gain set. Every
//! field is optional; anything left out falls back to the standard
//! 60-250 / 250-4000 / 4000-12000 Hz layout and flat gains.
//!
//! ```json
//! {
//!   "schema_version": "1.0",
//!   "layout": { "order": 4 },
//!   "gains": { "low_db": 3.0, "mid_db": 0.0, "high_db": -2.0 }
//! }
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dsp::{BandLayout, Equalizer, GainSet};
use crate::error::{Result, TribandError};

/// Current config schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

fn default_schema_version() -> String {
    CURRENT_SCHEMA_VERSION.to_string()
}

/// Band layout plus gains, as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub layout: BandLayout,
    pub gains: GainSet,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            layout: BandLayout::default(),
            gains: GainSet::flat(),
        }
    }
}

impl EqualizerConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(TribandError::InvalidConfig {
                reason: format!(
                    "unsupported schema version '{}' (expected '{}')",
                    config.schema_version, CURRENT_SCHEMA_VERSION
                ),
            });
        }
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TribandError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        info!("Loaded equalizer config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved equalizer config to {}", path.display());
        Ok(())
    }

    /// Check layout and gains against a sample rate
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        self.layout.validate_gains(&self.gains)?;
        self.layout.validate(sample_rate)
    }

    /// Build an equalizer for this layout
    pub fn equalizer(&self) -> Equalizer {
        Equalizer::new(self.layout.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::BandDefinition;
    use tempfile::tempdir;

    #[test]
    fn test_empty_json_is_default() {
        let config = EqualizerConfig::from_json("{}").unwrap();
        assert_eq!(config, EqualizerConfig::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EqualizerConfig::from_json(
            r#"{ "layout": { "order": 2 }, "gains": { "mid_db": 6.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.layout.order, 2);
        assert_eq!(config.layout.mid, BandDefinition::new(250.0, 4000.0));
        assert_eq!(config.gains, GainSet::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn test_unknown_schema_rejected() {
        let err = EqualizerConfig::from_json(r#"{ "schema_version": "9.9" }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_malformed_json() {
        let err = EqualizerConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eq.json");
        let config = EqualizerConfig {
            gains: GainSet::new(-3.0, 1.5, 4.0),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EqualizerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_validate() {
        let config = EqualizerConfig::default();
        assert!(config.validate(44100).is_ok());
        assert!(config.validate(16000).is_err());
    }
}
