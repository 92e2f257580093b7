//! Core domain models for the relay.

use super::value_object::{ConnectionId, DisplayName, Timestamp};

/// Text of the system message sent to a freshly accepted connection
pub const WELCOME_TEXT: &str = "Welcome to the chat!";

/// Kind of a relayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// User-authored message, always carries the sender's display name
    Chat,
    /// Server notice (welcome, departure), never carries a display name
    System,
}

/// A message relayed by the server. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    kind: MessageKind,
    data: String,
    username: Option<DisplayName>,
    timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a chat message attributed to `username`
    pub fn chat(data: String, username: DisplayName, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::Chat,
            data,
            username: Some(username),
            timestamp,
        }
    }

    /// Create a system notice
    pub fn system(data: String, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::System,
            data,
            username: None,
            timestamp,
        }
    }

    /// Greeting sent only to the connection that just joined
    pub fn welcome(timestamp: Timestamp) -> Self {
        Self::system(WELCOME_TEXT.to_string(), timestamp)
    }

    /// Notice broadcast when `name` leaves
    pub fn departure(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self::system(format!("{name} left the chat"), timestamp)
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn username(&self) -> Option<&DisplayName> {
        self.username.as_ref()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// A live connection as recorded in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Name assigned at registration, fixed for the connection's lifetime
    pub display_name: DisplayName,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new registry entry
    pub fn new(id: ConnectionId, display_name: DisplayName, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            connected_at,
        }
    }
}
