use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Connection settings for the processing backend.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional bearer token attached to every request. Without one,
    /// requests are sent unauthenticated.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_max_retries() -> u32 {
    3
}

/// Behavior of the interactive `scout watch` session.
#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Matches listed per concept before truncation.
    #[serde(default = "default_max_matches_shown")]
    pub max_matches_shown: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            max_matches_shown: default_max_matches_shown(),
        }
    }
}

fn default_max_matches_shown() -> usize {
    8
}

impl BackendConfig {
    /// Token from config, falling back to the `SCOUT_API_TOKEN` environment
    /// variable.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("SCOUT_API_TOKEN").ok())
    }
}

/// Load configuration from `path`. A missing file yields built-in defaults so
/// the client works out of the box against a local backend.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.backend.base_url.trim().is_empty() {
        anyhow::bail!("backend.base_url must not be empty");
    }

    if config.backend.timeout_secs == 0 {
        anyhow::bail!("backend.timeout_secs must be > 0");
    }

    if config.backend.max_retries > 10 {
        anyhow::bail!("backend.max_retries must be <= 10");
    }

    if config.watch.max_matches_shown == 0 {
        anyhow::bail!("watch.max_matches_shown must be > 0");
    }

    Ok(config)
}
