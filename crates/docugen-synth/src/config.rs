//! Synthesis settings
//!
//! Read from the `[synthesis]` table of a TOML file. Every key is optional:
//!
//! ```toml
//! [synthesis]
//! endpoint = "https://generativelanguage.googleapis.com/v1beta"
//! model = "gemini-3-flash-preview"
//! api_key = "..."
//! timeout_secs = 60
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default REST endpoint of the Gemini API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variables consulted for the API key, in order
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Provider connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Base URL of the REST API
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// API key (usually left out of files and taken from the environment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// File layout: settings live under `[synthesis]`, other tables are ignored
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    synthesis: SynthConfig,
}

impl SynthConfig {
    /// Parse the `[synthesis]` table of a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.synthesis.validate()?;
        Ok(file.synthesis)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check the parsed values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "endpoint",
                reason: "must not be empty".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model",
                reason: "must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fill a missing API key from the first non-empty variable of [`API_KEY_VARS`]
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            self.api_key = API_KEY_VARS
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|value| !value.trim().is_empty());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SynthConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_table() {
        let config = SynthConfig::from_toml(
            r#"
            [synthesis]
            model = "gemini-2.5-pro"
            timeout_secs = 15

            [[palettes]]
            id = "ignored"
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_missing_table_gives_defaults() {
        let config = SynthConfig::from_toml("").unwrap();
        assert_eq!(config, SynthConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = SynthConfig::from_toml("[synthesis]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "timeout_secs", .. }));
    }

    #[test]
    fn test_configured_key_wins_over_environment() {
        let config = SynthConfig {
            api_key: Some("from-file".to_string()),
            ..SynthConfig::default()
        }
        .with_env_api_key();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docugen.toml");
        std::fs::write(&path, "[synthesis]\nendpoint = \"http://localhost:8080\"\n").unwrap();

        let config = SynthConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080");
    }
}
