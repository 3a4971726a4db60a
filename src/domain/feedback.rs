//! Progress feedback events
//!
//! Feedback events are observations emitted at stage transitions. They never
//! influence control flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

/// A progress/status notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// Severity
    #[serde(rename = "type")]
    pub kind: FeedbackKind,

    /// Short message (`loading assets`, `archive created`, ...)
    pub message: String,

    /// Optional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl FeedbackEvent {
    /// Creates an `info` event
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Info,
            message: message.into(),
            payload: None,
        }
    }

    /// Creates a `success` event
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
            payload: None,
        }
    }

    /// Creates an `error` event
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
            payload: None,
        }
    }

    /// Attaches a payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
