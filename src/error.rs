use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `selfbuild`.
///
/// Each subsystem defines its own error variant. Startup code matches on
/// these to report what went wrong; request handlers map them to HTTP status
/// codes and never let them escape as panics.
#[derive(Debug, Error)]
pub enum SiteError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Agent log ───────────────────────────────────────────────────────
    #[error("log: {0}")]
    Log(#[from] LogError),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Agent log errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read structured log {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append structured log entry: {0}")]
    Append(String),
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection {connection} is closed")]
    ConnectionClosed { connection: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = SiteError::Config(ConfigError::Validation("empty host".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("empty host"));
    }

    #[test]
    fn site_error_converts_into_anyhow() {
        let err: anyhow::Error = SiteError::from(ConfigError::Load("bad toml".into())).into();
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn log_read_error_names_path() {
        let err = SiteError::Log(LogError::Read {
            path: "logs/structured_logs.jsonl".into(),
            source: std::io::Error::other("disk gone"),
        });
        assert!(err.to_string().contains("structured_logs.jsonl"));
    }

    #[test]
    fn transport_closed_names_connection() {
        let err = TransportError::ConnectionClosed { connection: 7 };
        assert_eq!(err.to_string(), "connection 7 is closed");
    }
}
