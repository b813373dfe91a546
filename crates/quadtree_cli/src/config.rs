//! Configuration management for the quadtree tool.
//!
//! This module handles loading and validation of the TOML configuration
//! file. The `[tree]` section describes the area new trees cover; the
//! `[logging]` section controls log output.

use anyhow::Context;
use quadtree::TreeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dimensions and tuning for trees created by the tool
    #[serde(default)]
    pub tree: TreeConfig,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::with_dimensions(1000.0, 1000.0),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, toml_content)
                .with_context(|| format!("Failed to create config file {}", path.display()))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing
    /// the issue.
    pub fn validate(&self) -> Result<(), String> {
        if self.tree.capacity < 1 {
            return Err("Tree capacity must be greater than 0".to_string());
        }

        for (name, value) in [("width", self.tree.width), ("height", self.tree.height)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(format!("Tree {name} must be a positive number, got {value}"));
                }
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.tree.width, Some(1000.0));
        assert_eq!(config.tree.height, Some(1000.0));
        assert_eq!(config.tree.capacity, 8);
        assert_eq!(config.tree.depth, 10);

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quadtree.toml");

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.tree.width, Some(1000.0));

        // Should create the file, and it should load back identically
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(reloaded.tree, config.tree);
    }

    #[test]
    fn test_load_from_existing_file() {
        let toml_content = r#"
[tree]
width = 640.0
height = 480.0
capacity = 4
depth = 6

[logging]
level = "debug"
json_format = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.tree.width, Some(640.0));
        assert_eq!(config.tree.height, Some(480.0));
        assert_eq!(config.tree.capacity, 4);
        assert_eq!(config.tree.depth, 6);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_serde_deserialization_with_defaults() {
        let config: AppConfig = toml::from_str("[tree]\nwidth = 50.0\n").unwrap();

        assert_eq!(config.tree.width, Some(50.0));
        assert!(config.tree.height.is_none());
        assert_eq!(config.tree.capacity, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[tree\nwidth = ").unwrap();

        let err = AppConfig::load_from_file(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.tree.width = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_capacity() {
        let mut config = AppConfig::default();
        config.tree.capacity = 0;

        let result = config.validate();
        assert!(result.unwrap_err().contains("capacity must be greater than 0"));
    }

    #[test]
    fn test_validation_bad_dimensions() {
        let mut config = AppConfig::default();
        config.tree.width = Some(-5.0);
        assert!(config.validate().unwrap_err().contains("width"));

        config.tree.width = Some(5.0);
        config.tree.height = Some(f64::NAN);
        assert!(config.validate().unwrap_err().contains("height"));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid_level".to_string();

        let result = config.validate();
        assert!(result.unwrap_err().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level '{}' should be valid", level);
        }
    }
}
