//! Configuration management.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fields::DEFAULT_PREFIX;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Citation recognition settings
    #[serde(default)]
    pub finder: FinderConfig,

    /// Field naming settings
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Citation recognition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Notation used when none is given on the command line
    #[serde(default = "default_notation")]
    pub notation: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            notation: default_notation(),
        }
    }
}

fn default_notation() -> String {
    "natbib".to_string()
}

/// Field naming configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Namespace prefix of field names
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with `BIBENDUM_<SECTION>__<KEY>`
/// environment variables taking precedence
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration, with environment overrides applied
pub fn get_config() -> Config {
    config::Config::builder()
        .add_source(environment())
        .build()
        .and_then(|settings| settings.try_deserialize())
        .unwrap_or_default()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("BIBENDUM")
        .prefix_separator("_")
        .separator("__")
}

/// First existing configuration file among `./bibendum.toml` and
/// `<config dir>/bibendum/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    config_file_candidates().into_iter().find(|p| p.is_file())
}

fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("bibendum.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("bibendum").join("config.toml"));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.finder.notation, "natbib");
        assert_eq!(config.fields.prefix, "bibendum_");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.format.is_none());
    }

    #[test]
    fn test_load_config_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bibendum.toml");
        std::fs::write(&path, "[fields]\nprefix = \"REF_\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.fields.prefix, "REF_");
        assert_eq!(config.finder, FinderConfig::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_config_file_candidates() {
        let candidates = config_file_candidates();
        assert_eq!(candidates[0], PathBuf::from("bibendum.toml"));
        assert!(candidates.iter().skip(1).all(|p| p.ends_with("bibendum/config.toml")));
    }
}
