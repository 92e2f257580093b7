//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute()（close 経路：解除＋退出通知）
//! - DisconnectParticipantUseCase::discard()（error 経路：解除のみ）
//!
//! ### どのような状況を想定しているか
//! - 正常系：残りの接続に退出通知が 1 回届く
//! - エッジケース：error → close の順に発火しても通知は高々 1 回
//! - エッジケース：未登録の接続の切断（何もしない）

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, ConnectionRegistry, DisplayName, Timestamp};

use super::broadcast::Broadcaster;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// close 経路：登録を解除し、解除できた場合のみ退出通知をブロードキャストする
    ///
    /// # Returns
    ///
    /// 解除した接続の表示名。既に解除済みなら `None`（通知もしない）
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<DisplayName> {
        let connection = self.registry.deregister(&connection_id).await?;

        let notice = ChatMessage::departure(&connection.display_name, Timestamp::now());
        self.broadcaster.broadcast(&notice).await;

        Some(connection.display_name)
    }

    /// error 経路：登録を解除するだけで通知はしない
    pub async fn discard(&self, connection_id: ConnectionId) -> Option<DisplayName> {
        self.registry
            .deregister(&connection_id)
            .await
            .map(|connection| connection.display_name)
    }

    /// 残りの接続数を取得
    pub async fn count_remaining(&self) -> usize {
        self.registry.count().await
    }
}
