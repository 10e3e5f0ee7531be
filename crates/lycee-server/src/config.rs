//! Server configuration.
//!
//! Values come from environment variables first, then the TOML config file,
//! then built-in defaults:
//!
//! ```toml
//! # <config_dir>/lycee-insight/config.toml
//! bind = "127.0.0.1:3001"
//! data_dir = "/srv/lycee-insight/data"
//! cache_ttl_secs = 300
//!
//! [completion]
//! endpoint = "http://127.0.0.1:8002/v1"
//! model = "gpt-4o"
//! timeout_secs = 60
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use lycee_core::analysis::DEFAULT_TTL_SECS;
use lycee_core::completion::{CompletionSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use serde::Deserialize;

pub const ENV_CONFIG: &str = "LYCEE_CONFIG";
pub const ENV_BIND: &str = "LYCEE_BIND";
pub const ENV_DATA_DIR: &str = "LYCEE_DATA_DIR";
pub const ENV_ENDPOINT: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "LYCEE_MODEL";
pub const ENV_API_KEY: &str = "LYCEE_API_KEY";
pub const ENV_COMPLETION_TIMEOUT: &str = "LYCEE_COMPLETION_TIMEOUT_SECS";
pub const ENV_CACHE_TTL: &str = "LYCEE_CACHE_TTL_SECS";

const DEFAULT_BIND: &str = "127.0.0.1:3001";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Config file that was read, if any
    pub config_path: Option<PathBuf>,
    /// Listen address
    pub bind: SocketAddr,
    /// Directory holding the fixture files
    pub data_dir: PathBuf,
    /// Process-wide completion settings
    pub completion: CompletionSettings,
    /// Timeout of one outbound completion call
    pub completion_timeout: Duration,
    /// Lifetime of a cached analysis
    pub cache_ttl: chrono::Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 3001)),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            completion: CompletionSettings::default(),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            cache_ttl: chrono::Duration::seconds(DEFAULT_TTL_SECS as i64),
        }
    }
}

/// On-disk representation; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    bind: Option<String>,
    data_dir: Option<PathBuf>,
    cache_ttl_secs: Option<u64>,
    completion: FileCompletionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileCompletionConfig {
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the process environment and config file
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config_path = match env(ENV_CONFIG) {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path().filter(|p| p.exists()),
        };
        let file = match &config_path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let bind_str = env(ENV_BIND)
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_str))?;

        let data_dir = env(ENV_DATA_DIR)
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let completion = CompletionSettings {
            api_key: env(ENV_API_KEY).or(file.completion.api_key.filter(|k| !k.trim().is_empty())),
            api_endpoint: env(ENV_ENDPOINT)
                .or(file.completion.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: env(ENV_MODEL)
                .or(file.completion.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        let timeout_secs = parse_secs(env(ENV_COMPLETION_TIMEOUT), ENV_COMPLETION_TIMEOUT)?
            .or(file.completion.timeout_secs)
            .unwrap_or(DEFAULT_COMPLETION_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("Completion timeout must be greater than zero");
        }

        let ttl_secs = parse_secs(env(ENV_CACHE_TTL), ENV_CACHE_TTL)?
            .or(file.cache_ttl_secs)
            .unwrap_or(DEFAULT_TTL_SECS);
        if ttl_secs == 0 {
            bail!("Cache TTL must be greater than zero");
        }
        let cache_ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .with_context(|| format!("Cache TTL of {} seconds is out of range", ttl_secs))?;

        Ok(Self {
            config_path,
            bind,
            data_dir,
            completion,
            completion_timeout: Duration::from_secs(timeout_secs),
            cache_ttl,
        })
    }
}

/// `<config_dir>/lycee-insight/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lycee-insight").join("config.toml"))
}

fn read_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
}

fn parse_secs(value: Option<String>, name: &str) -> anyhow::Result<Option<u64>> {
    value
        .map(|v| {
            v.parse::<u64>()
                .with_context(|| format!("{} must be a number of seconds, got {:?}", name, v))
        })
        .transpose()
}
