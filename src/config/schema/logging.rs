use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding `agents.log` and `structured_logs.jsonl`
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Entries returned by `GET /api/logs` when no `limit` is given
    #[serde(default = "default_log_limit")]
    pub default_limit: usize,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_limit() -> usize {
    50
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
            default_limit: default_log_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.dir, PathBuf::from("logs"));
        assert_eq!(config.level, "info");
        assert_eq!(config.default_limit, 50);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: LoggingConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.default_limit, 50);
    }
}
