//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{ConnectionId, DisplayName, error::ValueObjectError};

/// Prefix of every generated display name
pub const DISPLAY_NAME_PREFIX: &str = "User";

/// Generated suffixes are drawn uniformly from `0..DISPLAY_NAME_SUFFIX_BOUND`
pub const DISPLAY_NAME_SUFFIX_BOUND: u32 = 1000;

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating ephemeral display names.
///
/// Names are `"User" + n` with `n` in `[0, 1000)`. There is no collision
/// check, so two live connections may share a name.
pub struct DisplayNameFactory;

impl DisplayNameFactory {
    /// Generate a display name from the thread-local RNG.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<DisplayName, ValueObjectError> {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a display name from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Result<DisplayName, ValueObjectError> {
        let suffix = rng.random_range(0..DISPLAY_NAME_SUFFIX_BOUND);
        DisplayName::new(format!("{DISPLAY_NAME_PREFIX}{suffix}"))
    }
}
