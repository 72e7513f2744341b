//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`PodConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "PODKIT_TIMEOUT_SECS";
/// Environment variable overriding [`PodConfig::proxy_template`]
pub const ENV_PROXY: &str = "PODKIT_PROXY";
/// Environment variable overriding [`PodConfig::auth_token`]
pub const ENV_TOKEN: &str = "PODKIT_TOKEN";

/// Placeholder replaced by the percent-encoded target URI in a proxy template
pub const PROXY_PLACEHOLDER: &str = "{uri}";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for [`PodClient`](crate::PodClient) and its HTTP transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
    /// Cross-origin proxy, e.g. `https://proxy.example/?uri={uri}`
    pub proxy_template: Option<String>,
    /// Bearer token sent with credentialed requests
    pub auth_token: Option<String>,
    pub user_agent: String,
    /// Suffix appended to a workspace URI to list its containers
    pub container_glob: String,
    /// Suffix appended to a container URI to list its resources
    pub resource_glob: String,
    /// Upper bound on requests in flight during fan-out
    pub max_concurrent_requests: usize,
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 90,
            proxy_template: None,
            auth_token: None,
            user_agent: format!("podkit/{}", env!("CARGO_PKG_VERSION")),
            container_glob: ".*".to_string(),
            resource_glob: "*".to_string(),
            max_concurrent_requests: 8,
        }
    }
}

impl PodConfig {
    /// Parse YAML; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply `PODKIT_*` environment overrides
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_SECS.to_string(),
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_PROXY) {
            self.proxy_template = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = lookup(ENV_TOKEN) {
            self.auth_token = Some(value).filter(|v| !v.is_empty());
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_requests must be positive".into(),
            ));
        }
        if let Some(template) = &self.proxy_template {
            if !template.contains(PROXY_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "proxy_template {template:?} lacks {PROXY_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }
}
