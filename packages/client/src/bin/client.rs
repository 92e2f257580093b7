//! Terminal client for the chat relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatrelay-client -- --url ws://localhost:3000
//! ```

use chatrelay_client::ClientConfig;
use chatrelay_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    // Keep logs quiet so they don't interleave with the chat
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let config = ClientConfig::parse();

    if let Err(e) = chatrelay_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
