//! Server state.

use std::sync::Arc;

use crate::{domain::ConnectionRegistry, infrastructure::repository::InMemoryConnectionRegistry};

/// Shared application state, one per server instance
pub struct AppState {
    /// Registry（データアクセス層の抽象化）
    pub registry: Arc<dyn ConnectionRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// State backed by a fresh in-memory registry
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryConnectionRegistry::new()))
    }
}
