//! Client configuration.

use clap::Parser;

/// Server address used when neither `--url` nor `CHAT_URL` is given
pub const DEFAULT_URL: &str = "ws://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "chatrelay-client", version, about = "Terminal client for the chat relay")]
pub struct ClientConfig {
    /// WebSocket URL of the relay server
    #[arg(short, long, env = "CHAT_URL", default_value = DEFAULT_URL)]
    pub url: String,
}
