use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial connection could not be established
    #[error("Failed to connect to {url}")]
    ConnectFailed { url: String },

    /// Terminal input failed
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
