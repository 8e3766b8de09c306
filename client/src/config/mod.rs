pub mod manager;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::env;
use crate::errors::ConfigError;
pub use manager::ConfigManager;

/// Fully resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_server_url: String,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(api_server_url: impl Into<String>) -> Self {
        Self {
            api_server_url: api_server_url.into(),
            timeout_seconds: None,
            token: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_server_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "api_server_url".to_string(),
            });
        }

        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// One configuration layer (file, environment or command line); later layers win
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub api_server_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
}

impl PartialConfig {
    /// Layer read from `ARC_API_SERVER_URL`, `ARC_AUTH_TOKEN` and `ARC_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_seconds = match non_empty(env::TIMEOUT_SECONDS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: env::TIMEOUT_SECONDS.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            api_server_url: non_empty(env::API_SERVER_URL),
            timeout_seconds,
            token: non_empty(env::AUTH_TOKEN),
        })
    }

    /// Overlay `other` on top of `self`
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            api_server_url: other.api_server_url.or(self.api_server_url),
            timeout_seconds: other.timeout_seconds.or(self.timeout_seconds),
            token: other.token.or(self.token),
        }
    }

    pub fn resolve(self) -> Result<ClientConfig, ConfigError> {
        let api_server_url = self.api_server_url.ok_or_else(|| ConfigError::MissingRequired {
            field: "api_server_url".to_string(),
        })?;

        let config = ClientConfig {
            api_server_url,
            timeout_seconds: self.timeout_seconds,
            token: self.token,
        };
        config.validate()?;
        Ok(config)
    }
}
