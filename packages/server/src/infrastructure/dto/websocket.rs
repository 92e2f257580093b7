//! WebSocket message DTOs for the relay.
//!
//! Every frame is a UTF-8 JSON object:
//!
//! ```text
//! server -> client  {"type":"system"|"chat","data":"..","username"?:"..","timestamp":"<ISO-8601>"}
//! client -> server  {"data":".."}   (other fields ignored)
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, MessageKind};

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Chat,
    System,
}

impl From<MessageKind> for MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Chat => Self::Chat,
            MessageKind::System => Self::System,
        }
    }
}

/// Frame sent from the server to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub r#type: MessageType,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// ISO 8601 (UTC)
    pub timestamp: String,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            r#type: message.kind().into(),
            data: message.data().to_string(),
            username: message.username().map(|name| name.as_str().to_string()),
            timestamp: message.timestamp().to_iso8601(),
        }
    }
}

impl ChatMessageDto {
    /// Serialize a domain message to its wire text.
    pub fn encode(message: &ChatMessage) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Self::from(message))
    }
}

/// Frame received from a client. Only `data` is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessageDto {
    pub data: String,
}

impl InboundMessageDto {
    /// Parse an inbound text frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Frame a client sends; the server fills in username and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundChatDto {
    pub r#type: MessageType,
    pub data: String,
}

impl OutboundChatDto {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Chat,
            data: data.into(),
        }
    }
}
