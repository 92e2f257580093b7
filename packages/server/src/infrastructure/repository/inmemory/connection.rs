//! InMemory ConnectionRegistry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//! サーバーインスタンスごとに 1 つ生成し、グローバル状態は持ちません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, DisplayName, Outbound, RegistryError,
};

/// Registry entry: the domain record plus its outbound channel
struct Entry {
    connection: Connection,
    outbound: Outbound,
}

/// インメモリ ConnectionRegistry 実装
#[derive(Clone, Default)]
pub struct InMemoryConnectionRegistry {
    /// 接続中のクライアント（WebSocket sender を含む）
    entries: Arc<Mutex<HashMap<ConnectionId, Entry>>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection: Connection,
        outbound: Outbound,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&connection.id) {
            return Err(RegistryError::AlreadyRegistered(connection.id));
        }
        entries.insert(
            connection.id,
            Entry {
                connection,
                outbound,
            },
        );
        Ok(())
    }

    async fn deregister(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut entries = self.entries.lock().await;
        entries.remove(connection_id).map(|entry| entry.connection)
    }

    async fn display_name(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let entries = self.entries.lock().await;
        entries
            .get(connection_id)
            .map(|entry| entry.connection.display_name.clone())
    }

    async fn connections(&self) -> Vec<Connection> {
        let entries = self.entries.lock().await;
        entries
            .values()
            .map(|entry| entry.connection.clone())
            .collect()
    }

    async fn open_outbounds(&self) -> Vec<(ConnectionId, Outbound)> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .filter(|(_, entry)| !entry.outbound.is_closed())
            .map(|(id, entry)| (*id, entry.outbound.clone()))
            .collect()
    }

    async fn count(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }
}
