//! WebSocket chat relay library.
//!
//! Accepts WebSocket connections, gives each an ephemeral display name, and
//! relays every chat message to all connected clients together with
//! join/leave system notices.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run as run_server;
