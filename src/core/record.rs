//! Canonical log record shared by all sinks

use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The normalized, immutable representation of one log call.
///
/// Produced exactly once per `Logger::log` call and handed to every sink;
/// sinks never re-derive `stack` or `extra` from the raw arguments.
/// `stack` and `extra` are omitted from serialized output when absent so
/// downstream consumers never see a misleading empty marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Trimmed stack-trace lines, present only when the caller's message
    /// argument was itself error-like.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    /// Additional positional arguments beyond level+message, in call order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<serde_json::Value>>,
}

impl LogRecord {
    pub fn new(level: Severity, message: String) -> Self {
        Self {
            level,
            message,
            timestamp: Utc::now(),
            stack: None,
            extra: None,
        }
    }

    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn with_extra(mut self, extra: Vec<serde_json::Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Compact JSON rendition used by the remote sink's batch events.
    pub fn to_json(&self) -> super::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
