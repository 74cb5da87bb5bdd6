use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    Info,
    Error,
}

/// Structured audit record, one per mutation attempt.
///
/// Serialized form (one line in the log file):
/// `{"logID":..,"timestamp":..,"type":"INFO","message":..,"parameters":{..}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "logID")]
    pub log_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl LogRecord {
    pub fn new(kind: LogType, message: impl Into<String>) -> Self {
        Self {
            log_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            message: message.into(),
            parameters: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogType::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogType::Error, message)
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == LogType::Error
    }

    /// Compact single-line JSON
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
