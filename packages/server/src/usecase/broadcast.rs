//! UseCase: ブロードキャスト処理
//!
//! メッセージを一度だけシリアライズし、送信側が開いている全ての接続へ送る。
//! 個別の送信失敗はログに残して続行する（レジストリからは削除しない）。

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, ConnectionRegistry},
    infrastructure::dto::websocket::ChatMessageDto,
};

/// 全接続へのファンアウト
#[derive(Clone)]
pub struct Broadcaster {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl Broadcaster {
    /// 新しい Broadcaster を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// `message` を全ての開いている接続へ送信する
    ///
    /// # Returns
    ///
    /// 送信キューへの投入に成功した接続数
    pub async fn broadcast(&self, message: &ChatMessage) -> usize {
        let text = match ChatMessageDto::encode(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize broadcast message: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        for (connection_id, outbound) in self.registry.open_outbounds().await {
            if outbound.send(text.clone()).is_err() {
                tracing::warn!(%connection_id, "Failed to queue broadcast frame");
            } else {
                delivered += 1;
            }
        }
        tracing::debug!(delivered, "Broadcasted {:?} message", message.kind());
        delivered
    }
}
