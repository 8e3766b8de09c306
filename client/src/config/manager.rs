use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use super::{ClientConfig, PartialConfig};
use crate::errors::{ArcError, ConfigError};

/// Looked up when no explicit path is given; silently skipped if absent
pub const DEFAULT_CONFIG_PATH: &str = "config/arc.toml";

pub struct ConfigManager {
    current_config: Arc<ClientConfig>,
}

impl ConfigManager {
    /// Resolve configuration from, in increasing priority: the TOML file, the
    /// environment, then `overrides` (usually command-line flags).
    ///
    /// An explicit `path` must exist. Without one, `config/arc.toml` is used when present.
    pub async fn new(path: Option<&Path>, overrides: PartialConfig) -> Result<Self, ArcError> {
        let config = Self::load_configuration(path, overrides).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<ClientConfig> {
        self.current_config.clone()
    }

    async fn load_configuration(
        path: Option<&Path>,
        overrides: PartialConfig,
    ) -> Result<ClientConfig, ConfigError> {
        let file_layer = match path {
            Some(path) => Self::read_file(path).await?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if fs::try_exists(&default_path).await.unwrap_or(false) {
                    Self::read_file(&default_path).await?
                } else {
                    debug!("No config file at {}, using environment only", DEFAULT_CONFIG_PATH);
                    PartialConfig::default()
                }
            }
        };

        let config = file_layer
            .merge(PartialConfig::from_env()?)
            .merge(overrides)
            .resolve()?;

        info!(
            "Configuration loaded: server {}, timeout {}",
            config.api_server_url,
            config
                .timeout_seconds
                .map_or_else(|| "default".to_string(), |s| format!("{}s", s))
        );

        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<PartialConfig, ConfigError> {
        debug!("Loading config file: {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
