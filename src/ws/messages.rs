//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SUBMISSIONS_TOPIC;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message replying to `id`.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    /// Serializes the message to JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client aggregate snapshot.
    Snapshot,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket, carried in the
/// envelope's `payload`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to insert events on a topic.
    Subscribe {
        /// Topic name; only `"submissions"` exists.
        #[serde(default = "default_topic")]
        topic: String,
        /// Country codes to follow. Use `["*"]` (the default) for all.
        #[serde(default = "wildcard")]
        country_codes: Vec<String>,
        /// Push a fresh aggregate snapshot after every matching event.
        #[serde(default)]
        refetch: bool,
    },
    /// Stop following some country codes.
    Unsubscribe {
        /// Country codes to drop. `"*"` clears everything.
        country_codes: Vec<String>,
    },
    /// Read the current aggregate once.
    GetStats,
}

impl WsCommand {
    /// Command names accepted in the `command` field.
    pub const NAMES: [&'static str; 3] = ["subscribe", "unsubscribe", "get_stats"];
}

fn default_topic() -> String {
    SUBMISSIONS_TOPIC.to_string()
}

fn wildcard() -> Vec<String> {
    vec!["*".to_string()]
}
