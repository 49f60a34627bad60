use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SystemStatus {
    #[default]
    Active,
    Paused,
}

/// Process-wide orchestration state as seen by creators.
///
/// `paused` and `status` encode the same fact; [`SystemState::set_paused`] is
/// the only mutator and keeps them in step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    pub status: SystemStatus,
    pub paused: bool,
    pub last_checkpoint: Option<String>,
    pub current_task: Option<String>,
}

impl SystemState {
    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.status = if paused {
            SystemStatus::Paused
        } else {
            SystemStatus::Active
        };
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.paused == (self.status == SystemStatus::Paused)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Frames pushed from the server to creator connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    SystemState {
        data: SystemState,
        timestamp: String,
    },
    SystemPaused {
        message: String,
        timestamp: String,
    },
    SystemResumed {
        message: String,
        timestamp: String,
    },
    RollbackInitiated {
        message: String,
        checkpoint: String,
        timestamp: String,
    },
    CreatorMessage {
        message: String,
        timestamp: String,
    },
    Error {
        message: String,
        timestamp: String,
    },
}

impl ServerEvent {
    pub fn system_state(state: SystemState) -> Self {
        Self::SystemState {
            data: state,
            timestamp: now(),
        }
    }

    pub fn system_paused() -> Self {
        Self::SystemPaused {
            message: "System has been paused".into(),
            timestamp: now(),
        }
    }

    pub fn system_resumed() -> Self {
        Self::SystemResumed {
            message: "System has been resumed".into(),
            timestamp: now(),
        }
    }

    pub fn rollback_initiated(checkpoint: &str) -> Self {
        Self::RollbackInitiated {
            message: format!("Rollback to checkpoint {checkpoint} initiated"),
            checkpoint: checkpoint.to_string(),
            timestamp: now(),
        }
    }

    pub fn creator_message(message: impl Into<String>) -> Self {
        Self::CreatorMessage {
            message: message.into(),
            timestamp: now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: now(),
        }
    }

    /// The wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SystemState { .. } => "system_state",
            Self::SystemPaused { .. } => "system_paused",
            Self::SystemResumed { .. } => "system_resumed",
            Self::RollbackInitiated { .. } => "rollback_initiated",
            Self::CreatorMessage { .. } => "creator_message",
            Self::Error { .. } => "error",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"error","message":"serialization failed"}"#.to_string())
    }
}

/// Normalized command handed to the external orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueuedCommand {
    Pause { timestamp: String },
    Resume { timestamp: String },
    Rollback { checkpoint: String, timestamp: String },
    Message { message: String, timestamp: String },
}

impl QueuedCommand {
    pub fn pause() -> Self {
        Self::Pause { timestamp: now() }
    }

    pub fn resume() -> Self {
        Self::Resume { timestamp: now() }
    }

    pub fn rollback(checkpoint: &str) -> Self {
        Self::Rollback {
            checkpoint: checkpoint.to_string(),
            timestamp: now(),
        }
    }

    pub fn message(message: &str) -> Self {
        Self::Message {
            message: message.to_string(),
            timestamp: now(),
        }
    }
}
