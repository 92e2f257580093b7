//! Utilities shared by the chatrelay server and client.

pub mod logger;
pub mod time;
