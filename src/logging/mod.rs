//! Agent activity log.
//!
//! Every entry is written twice: once as a human-readable line through
//! `tracing` (console and `agents.log`, see [`init_tracing`]) and once as a
//! JSON object appended to `structured_logs.jsonl`. The two writes are
//! independent; a failure on one side does not roll back the other.

mod subscriber;

pub use subscriber::init_tracing;

use crate::error::LogError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the JSON-lines log inside the log directory.
pub const STRUCTURED_LOG_FILE: &str = "structured_logs.jsonl";
/// File name of the human-readable log inside the log directory.
pub const TEXT_LOG_FILE: &str = "agents.log";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

/// One structured line as written by [`AgentLogger::record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub agent: String,
    pub action: String,
    pub level: LogLevel,
    pub message: String,
    pub metadata: Map<String, Value>,
}

impl LogEntry {
    fn display_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.agent.to_uppercase(),
            self.action,
            self.message
        )
    }
}

pub struct AgentLogger {
    structured_path: PathBuf,
    append_lock: Mutex<()>,
}

impl AgentLogger {
    /// Create the logger, making sure the log directory exists.
    pub fn new(log_dir: impl Into<PathBuf>) -> Result<Self, LogError> {
        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir).map_err(|source| LogError::CreateDir {
            path: log_dir.display().to_string(),
            source,
        })?;
        let structured_path = log_dir.join(STRUCTURED_LOG_FILE);

        Ok(Self {
            structured_path,
            append_lock: Mutex::new(()),
        })
    }

    pub fn structured_path(&self) -> &Path {
        &self.structured_path
    }

    /// Record an agent action. Never fails; sink errors are reported through `tracing`.
    ///
    /// The JSONL append is a blocking `std::fs` write on the caller's thread,
    /// so an entry is visible to [`AgentLogger::recent`] as soon as this
    /// returns. Callers holding locks pay for one small append per entry; move
    /// the append to a dedicated writer if log volume grows.
    pub fn record(
        &self,
        agent: &str,
        action: &str,
        level: LogLevel,
        message: &str,
        metadata: Option<Map<String, Value>>,
    ) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            agent: agent.to_string(),
            action: action.to_string(),
            level,
            message: message.to_string(),
            metadata: metadata.unwrap_or_default(),
        };

        let line = entry.display_line();
        match level {
            LogLevel::Error => tracing::error!(target: "selfbuild::agents", "{line}"),
            LogLevel::Warning => tracing::warn!(target: "selfbuild::agents", "{line}"),
            LogLevel::Success => tracing::info!(target: "selfbuild::agents", "✓ {line}"),
            LogLevel::Info => tracing::info!(target: "selfbuild::agents", "{line}"),
        }

        if let Err(error) = self.append(&entry) {
            tracing::error!(
                path = %self.structured_path.display(),
                "structured log append failed: {error}"
            );
        }
    }

    fn append(&self, entry: &LogEntry) -> Result<(), LogError> {
        let mut line =
            serde_json::to_string(entry).map_err(|e| LogError::Append(e.to_string()))?;
        line.push('\n');

        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.structured_path)
            .map_err(|e| LogError::Append(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| LogError::Append(e.to_string()))
    }

    /// The last `limit` structured entries, most recent first.
    ///
    /// Any line holding a JSON object is returned as-is, including lines
    /// written by other tools with extra, missing, or unfamiliar fields.
    /// Lines that are not JSON objects are skipped but still count towards
    /// `limit`.
    pub fn recent(&self, limit: usize) -> Result<Vec<Value>, LogError> {
        let contents = match fs::read_to_string(&self.structured_path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LogError::Read {
                    path: self.structured_path.display().to_string(),
                    source,
                });
            }
        };

        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(limit);

        Ok(lines[start..]
            .iter()
            .rev()
            .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
            .filter(Value::is_object)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AgentLogger) {
        let dir = TempDir::new().unwrap();
        let logger = AgentLogger::new(dir.path().join("logs")).unwrap();
        (dir, logger)
    }

    #[test]
    fn new_creates_log_directory() {
        let (dir, logger) = logger();
        assert!(dir.path().join("logs").is_dir());
        assert_eq!(logger.structured_path(), dir.path().join("logs").join(STRUCTURED_LOG_FILE));
    }

    #[test]
    fn recent_on_missing_file_is_empty() {
        let (_dir, logger) = logger();
        assert!(logger.recent(10).unwrap().is_empty());
    }

    #[test]
    fn recent_returns_last_entries_most_recent_first() {
        let (_dir, logger) = logger();
        for i in 0..5 {
            logger.record("builder", "step", LogLevel::Info, &format!("entry {i}"), None);
        }

        let recent = logger.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["message"], "entry 4");
        assert_eq!(recent[1]["message"], "entry 3");
    }

    #[test]
    fn recent_with_large_limit_returns_everything() {
        let (_dir, logger) = logger();
        logger.record("a", "one", LogLevel::Info, "first", None);
        logger.record("b", "two", LogLevel::Info, "second", None);

        let recent = logger.recent(50).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["message"], "second");
    }

    #[test]
    fn recent_with_zero_limit_is_empty() {
        let (_dir, logger) = logger();
        logger.record("a", "one", LogLevel::Info, "first", None);
        assert!(logger.recent(0).unwrap().is_empty());
    }

    #[test]
    fn recent_skips_malformed_lines() {
        let (_dir, logger) = logger();
        logger.record("a", "one", LogLevel::Info, "first", None);
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(logger.structured_path())
                .unwrap();
            file.write_all(b"{not json\n[1, 2]\n").unwrap();
        }
        logger.record("a", "two", LogLevel::Info, "second", None);

        let recent = logger.recent(10).unwrap();
        let messages: Vec<_> = recent.iter().map(|e| e["message"].clone()).collect();
        assert_eq!(messages, vec![json!("second"), json!("first")]);
    }

    #[test]
    fn recent_keeps_foreign_json_objects() {
        let (_dir, logger) = logger();
        logger.record("a", "one", LogLevel::Info, "first", None);
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(logger.structured_path())
                .unwrap();
            file.write_all(b"{\"agent\": \"deployer\", \"level\": \"debug\"}\n")
                .unwrap();
        }

        let recent = logger.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["agent"], "deployer");
        assert_eq!(recent[0]["level"], "debug");
        assert!(recent[0].get("message").is_none());
        assert_eq!(recent[1]["message"], "first");
    }

    #[test]
    fn record_persists_level_and_metadata() {
        let (_dir, logger) = logger();
        let mut metadata = Map::new();
        metadata.insert("command_data".into(), json!({"checkpoint": "c1"}));
        logger.record(
            "messenger",
            "command_received",
            LogLevel::Success,
            "Received command: rollback",
            Some(metadata),
        );

        let raw = fs::read_to_string(logger.structured_path()).unwrap();
        let value: Value = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(value["agent"], "messenger");
        assert_eq!(value["level"], "success");
        assert_eq!(value["metadata"]["command_data"]["checkpoint"], "c1");
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn record_without_metadata_writes_empty_object() {
        let (_dir, logger) = logger();
        logger.record("system", "startup", LogLevel::Info, "up", None);
        let entry = &logger.recent(1).unwrap()[0];
        assert_eq!(entry["metadata"], json!({}));
    }

    #[test]
    fn display_line_uppercases_agent() {
        let entry = LogEntry {
            timestamp: String::new(),
            agent: "orchestrator".into(),
            action: "system_paused".into(),
            level: LogLevel::Warning,
            message: "System paused by creator command".into(),
            metadata: Map::new(),
        };
        assert_eq!(
            entry.display_line(),
            "[ORCHESTRATOR] system_paused: System paused by creator command"
        );
    }

    #[test]
    fn log_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "\"warning\"");
        assert_eq!(LogLevel::Success.to_string(), "success");
    }
}
