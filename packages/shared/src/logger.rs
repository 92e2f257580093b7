//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the binary, both chatrelay crates and
/// `tower_http` log at `default_level`. Calling this more than once is a no-op.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!(
        "{target}={level},chatrelay_server={level},chatrelay_client={level},tower_http={level}"
    )
}
