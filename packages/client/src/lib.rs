//! Client side of the chat relay.
//!
//! [`ChatClient`] owns one WebSocket connection and exposes its state
//! reactively; [`run_client`] is a terminal UI built on top of it.

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;

// Re-export entry points
pub use cli::run_client;
pub use config::ClientConfig;
pub use connection::{ChatClient, ClientState};
pub use error::ClientError;
