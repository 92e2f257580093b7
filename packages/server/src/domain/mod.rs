//! Domain layer for the relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, MessageKind};
pub use error::{RegistryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, DisplayNameFactory};
pub use repository::{ConnectionRegistry, Outbound};
pub use value_object::{ConnectionId, DisplayName, Timestamp};

#[cfg(test)]
pub use repository::MockConnectionRegistry;
