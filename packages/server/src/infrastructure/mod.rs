//! Infrastructure layer: wire formats and storage implementations.

pub mod dto;
pub mod repository;
