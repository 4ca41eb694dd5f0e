//! Configuration loading for Dark Matter.
//! Reads darkmatter.toml from the current directory or the path in DARKMATTER_CONFIG env var.
//! Every field has a default, so an absent default file yields a runnable configuration.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "DARKMATTER_CONFIG";
pub const API_KEY_ENV: &str = "DARKMATTER_FIREBASE_API_KEY";
pub const DEFAULT_CONFIG_PATH: &str = "darkmatter.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}\nCopy darkmatter.example.toml to darkmatter.toml and edit it.")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub folding: FoldingConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Sessions untouched for this long are dropped along with their scratch file.
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16    { 8501 }
fn default_static_dir() -> String { "static".to_string() }
fn default_session_idle() -> u64  { 86_400 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            session_idle_secs: default_session_idle(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentityConfig {
    /// Web API key of the Firebase project.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
}

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_identity_base_url() }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoldingConfig {
    #[serde(default = "default_fold_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_fold_timeout")]
    pub timeout_secs: u64,
    /// Extra attempts after the first one for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_fold_endpoint() -> String { "https://api.esmatlas.com/foldSequence/v1/pdb/".to_string() }
fn default_fold_timeout()  -> u64    { 120 }
fn default_max_retries()   -> u32    { 2 }
fn default_backoff_ms()    -> u64    { 500 }

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_fold_endpoint(),
            timeout_secs: default_fold_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_backoff_ms(),
        }
    }
}

impl FoldingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScratchConfig {
    #[serde(default = "default_scratch_dir")]
    pub dir: PathBuf,
}

fn default_scratch_dir() -> PathBuf { PathBuf::from("data") }

impl Default for ScratchConfig {
    fn default() -> Self {
        Self { dir: default_scratch_dir() }
    }
}


impl Config {
    /// Load configuration from darkmatter.toml.
    /// Checks DARKMATTER_CONFIG env var first, then current directory.
    /// A `.env` file is honoured, and DARKMATTER_FIREBASE_API_KEY overrides identity.api_key.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load_from(DEFAULT_CONFIG_PATH)?,
            Err(_) => {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                Self::default()
            }
        };

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        if config.identity.api_key.is_none() {
            warn!("No Firebase API key configured (set identity.api_key or {})", API_KEY_ENV);
        }
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.identity.api_key = Some(SecretString::from(key));
        }
    }
}
