//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信フレームの解析、送信者名の付与、全接続へのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者自身を含む全接続に 1 回ずつ届く
//! - 異常系：不正な JSON / data 欠落（ブロードキャストしない）
//! - 異常系：未登録の接続からの送信

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, ConnectionId, ConnectionRegistry, Timestamp},
    infrastructure::dto::websocket::InboundMessageDto,
};

use super::{broadcast::Broadcaster, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続 ID（Domain Model）
    /// * `frame` - 受信したテキストフレーム（`{"data": string}`）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - ブロードキャストが届いた接続数
    /// * `Err(SendMessageError)` - 送信失敗（何もブロードキャストされない）
    pub async fn execute(&self, from: ConnectionId, frame: &str) -> Result<usize, SendMessageError> {
        let inbound = InboundMessageDto::decode(frame)
            .map_err(|e| SendMessageError::MalformedFrame(e.to_string()))?;

        let username = self
            .registry
            .display_name(&from)
            .await
            .ok_or(SendMessageError::NotRegistered(from))?;

        let message = ChatMessage::chat(inbound.data, username, Timestamp::now());
        Ok(self.broadcaster.broadcast(&message).await)
    }
}
