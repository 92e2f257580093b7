//! WebSocket relay server implementation.

pub mod error;
mod handler;
pub mod lifecycle;
mod runner;
mod signal;
pub mod state;

pub use error::ServerError;
pub use runner::{build_router, run, serve};
pub use signal::shutdown_signal;
