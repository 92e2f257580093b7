//! Process configuration.

use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;

/// Port used when neither `--port` nor `PORT` is given
pub const DEFAULT_PORT: u16 = 3000;

/// Relay server configuration
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "chatrelay-server", version, about = "WebSocket chat relay server")]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ServerConfig {
    /// Address the listener binds to (all interfaces).
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}
