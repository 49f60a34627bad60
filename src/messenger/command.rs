use serde_json::{Map, Value};
use thiserror::Error;

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// A creator command as received: `{"type": ..., "data": {...}}`.
/// A missing `type` is `Null`; a missing `data` is `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub kind: Value,
    pub data: Value,
}

/// The payload was valid JSON but not an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Command must be a JSON object")]
pub struct NotAnObject;

impl RawCommand {
    /// Accepts any JSON object; arrays and scalars are rejected.
    pub fn from_value(value: Value) -> Result<Self, NotAnObject> {
        let Value::Object(mut object) = value else {
            return Err(NotAnObject);
        };
        Ok(Self {
            kind: object.remove("type").unwrap_or(Value::Null),
            data: object.remove("data").unwrap_or_else(empty_object),
        })
    }

    /// Human-readable command type for logs and error messages.
    pub fn label(&self) -> String {
        match &self.kind {
            Value::String(kind) => kind.clone(),
            other => other.to_string(),
        }
    }

    fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorCommand {
    Pause,
    Resume,
    /// `None` when the checkpoint is missing, empty, or not a string.
    Rollback { checkpoint: Option<String> },
    Message { text: String },
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown command type: {0}")]
pub struct UnknownCommand(pub String);

impl CreatorCommand {
    pub fn parse(raw: &RawCommand) -> Result<Self, UnknownCommand> {
        let Value::String(kind) = &raw.kind else {
            return Err(UnknownCommand(raw.label()));
        };

        match kind.as_str() {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "rollback" => Ok(Self::Rollback {
                checkpoint: raw
                    .data_str("checkpoint")
                    .filter(|checkpoint| !checkpoint.is_empty())
                    .map(ToOwned::to_owned),
            }),
            "message" => Ok(Self::Message {
                text: raw.data_str("message").unwrap_or_default().to_string(),
            }),
            "status" => Ok(Self::Status),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}
