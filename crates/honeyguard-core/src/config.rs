use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use honeyguard_client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "HONEYGUARD_API_URL";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means requests wait as long as the backend takes
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub stats_interval_ms: u64,
    #[serde(default = "default_poll_interval")]
    pub intel_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            stats_interval_ms: default_poll_interval(),
            intel_interval_ms: default_poll_interval(),
        }
    }
}

impl PollingConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms)
    }

    pub fn intel_interval(&self) -> Duration {
        Duration::from_millis(self.intel_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SocConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("invalid config yaml")
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Defaults, then the YAML file, then `env_api_url`, then `cli_api_url`.
    pub fn resolve(
        path: Option<&Path>,
        env_api_url: Option<String>,
        cli_api_url: Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
            config.api.base_url = url;
        }
        if let Some(url) = cli_api_url {
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Like [`SocConfig::resolve`], reading the override from the process environment.
    pub fn resolve_from_env(path: Option<&Path>, cli_api_url: Option<String>) -> Result<Self> {
        Self::resolve(path, std::env::var(API_URL_ENV).ok(), cli_api_url)
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| anyhow!("invalid api.base_url '{}': {e}", self.api.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url must use http or https, got '{}'",
                parsed.scheme()
            );
        }
        if self.polling.stats_interval_ms == 0 || self.polling.intel_interval_ms == 0 {
            bail!("polling intervals must be greater than zero");
        }
        if self.api.request_timeout_ms == Some(0) {
            bail!("api.request_timeout_ms must be greater than zero when set");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_ms.map(Duration::from_millis)
    }
}
