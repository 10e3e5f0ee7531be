//! Configuration management for lycee.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Command-line flags and environment variables (handled by clap)
//! 2. Config file (`LYCEE_CONFIG`, else `<config_dir>/lycee-insight/config.toml`),
//!    shared with lycee-server
//! 3. Default values

use anyhow::{Context, Result, bail};
use lycee_core::completion::{CompletionSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the fixture files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Completion service settings
    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn validate_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        bail!("Completion timeout must be greater than zero");
    }
    Ok(())
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            completion: CompletionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        validate_timeout(config.completion.timeout_secs)?;
        Ok(config)
    }

    /// Request timeout, `override_secs` (flag or env) winning over the file.
    pub fn completion_timeout(&self, override_secs: Option<u64>) -> Result<Duration> {
        let secs = override_secs.unwrap_or(self.completion.timeout_secs);
        validate_timeout(secs)?;
        Ok(Duration::from_secs(secs))
    }

    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        match std::env::var("LYCEE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => dirs::config_dir().map(|dir| dir.join("lycee-insight").join("config.toml")),
        }
    }

    /// Process-wide completion settings from the file values.
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            api_key: self
                .completion
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            api_endpoint: self.completion.endpoint.clone(),
            model: self.completion.model.clone(),
        }
    }
}
