//! Connection registry abstraction.
//!
//! The use case layer depends on this trait; the in-memory implementation
//! lives in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{Connection, ConnectionId, DisplayName, error::RegistryError};

/// Outbound half of a connection: serialized frames pushed here are written
/// to the socket by the connection's writer task.
///
/// The transport counts as open while the receiving half is alive.
pub type Outbound = UnboundedSender<String>;

/// Mapping from live connection to its assigned display name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection together with its outbound channel.
    async fn register(
        &self,
        connection: Connection,
        outbound: Outbound,
    ) -> Result<(), RegistryError>;

    /// Remove a connection. Returns the removed entry, or `None` if it was
    /// not (or no longer) registered.
    async fn deregister(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// Look up the display name of a registered connection.
    async fn display_name(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// All registered connections, in no particular order.
    async fn connections(&self) -> Vec<Connection>;

    /// Outbound channels of every registered connection whose transport is
    /// still open. Closed ones are skipped, not removed.
    async fn open_outbounds(&self) -> Vec<(ConnectionId, Outbound)>;

    /// Number of registered connections.
    async fn count(&self) -> usize;
}
