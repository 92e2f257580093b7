//! WebSocket chat relay server.
//!
//! Assigns every connection a random display name and relays chat messages
//! to all connected clients.
//!
//! Run with:
//! ```not_rust
//! PORT=3000 cargo run --bin chatrelay-server
//! ```

use chatrelay_server::ServerConfig;
use chatrelay_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::parse();

    // Run the server
    if let Err(e) = chatrelay_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
