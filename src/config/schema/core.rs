use super::{FrontendConfig, GatewayConfig, LoggingConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".selfbuild").join("config.toml"),
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
            frontend: FrontendConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gateway.host must not be empty".into(),
            ));
        }
        if self.logging.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "logging.dir must not be empty".into(),
            ));
        }
        if self.logging.default_limit == 0 {
            return Err(ConfigError::Validation(
                "logging.default_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
