//! Election run configuration

use crate::error::{ElectionError, Result};
use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings shared by the monitor, the nodes and the id assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    /// Which end of the id range wins
    pub priority: Priority,

    /// Capacity of each node-to-monitor status channel
    pub status_buffer: usize,

    /// Pause between rendered frames, in milliseconds
    pub frame_delay_ms: u64,

    /// Smallest id the random assignment may draw
    pub id_min: u64,

    /// Largest id the random assignment may draw
    pub id_max: u64,

    /// Radius of the circular layout hint
    pub layout_radius: f64,

    /// Seed for reproducible random id assignment
    pub seed: Option<u64>,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            priority: Priority::Highest,
            status_buffer: 1024,
            frame_delay_ms: 500,
            id_min: 1,
            id_max: 99,
            layout_radius: 20.0,
            seed: None,
        }
    }
}

impl ElectionConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ElectionError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ElectionError::configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            ElectionError::configuration(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.status_buffer == 0 {
            return Err(ElectionError::configuration(
                "Status buffer must hold at least one event",
            ));
        }

        if self.id_min > self.id_max {
            return Err(ElectionError::configuration(format!(
                "Id range is empty: {} > {}",
                self.id_min, self.id_max
            )));
        }

        if !self.layout_radius.is_finite() || self.layout_radius <= 0.0 {
            return Err(ElectionError::configuration(
                "Layout radius must be a positive number",
            ));
        }

        Ok(())
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    /// Configuration without pauses between frames
    pub fn headless() -> Self {
        Self {
            frame_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ElectionConfig::default();
        assert_eq!(config.priority, Priority::Highest);
        assert_eq!(config.frame_delay(), Duration::from_millis(500));
        assert_eq!((config.id_min, config.id_max), (1, 99));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ElectionConfig::headless();
        assert!(config.validate().is_ok());

        config.status_buffer = 0;
        assert!(config.validate().is_err());

        config.status_buffer = 8;
        config.id_min = 50;
        config.id_max = 10;
        assert!(config.validate().is_err());

        config.id_max = 50;
        config.layout_radius = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ElectionConfig = toml::from_str("priority = \"lowest\"\nseed = 7\n").unwrap();
        assert_eq!(config.priority, Priority::Lowest);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.status_buffer, 1024);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("election.toml");

        let config = ElectionConfig {
            seed: Some(42),
            ..ElectionConfig::default()
        };
        config.to_file(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = ElectionConfig::from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "status_buffer = \"many\"").unwrap();

        let err = ElectionConfig::from_file(&config_path).unwrap_err();
        assert!(err.is_configuration());
    }
}
