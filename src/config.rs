// =============================================================================
// Application Configuration
// =============================================================================
//
// Settings are read once at startup: an optional JSON file supplies the base
// values, then `STOCKPREDICT_*` environment variables override individual
// fields. Every field carries a serde default so a partial (or empty) file
// still loads.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "stockpredict.json";

pub const ENV_BIND_ADDR: &str = "STOCKPREDICT_BIND_ADDR";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "STOCKPREDICT_FETCH_TIMEOUT_SECS";
pub const ENV_PROVIDER_URL: &str = "STOCKPREDICT_PROVIDER_URL";
pub const ENV_OFFLINE: &str = "STOCKPREDICT_OFFLINE";
pub const ENV_PREDICTION_TIMEFRAME: &str = "STOCKPREDICT_PREDICTION_TIMEFRAME";

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_provider_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_prediction_timeframe() -> String {
    "2y".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Upper bound on a single live-provider request.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Base URL of the chart API.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Serve synthetic data only; the live provider is never contacted.
    #[serde(default)]
    pub offline: bool,

    /// History loaded before running a prediction.
    #[serde(default = "default_prediction_timeframe")]
    pub prediction_timeframe: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            provider_url: default_provider_url(),
            offline: false,
            prediction_timeframe: default_prediction_timeframe(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// File at `path` if it exists, defaults otherwise, then the environment.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Values that fail to parse are ignored
    /// with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.fetch_timeout_secs = secs,
                _ => warn!(key = ENV_FETCH_TIMEOUT_SECS, value = %raw, "ignoring invalid override"),
            }
        }
        if let Some(url) = lookup(ENV_PROVIDER_URL) {
            self.provider_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_OFFLINE) {
            self.offline = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true");
        }
        if let Some(tf) = lookup(ENV_PREDICTION_TIMEFRAME) {
            self.prediction_timeframe = tf;
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
