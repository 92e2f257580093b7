//! UseCase: 接続登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 表示名の生成とレジストリへの登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録（N 接続で N 件）
//! - 異常系：同じ ConnectionId での二重登録

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, DisplayName, DisplayNameFactory, Outbound,
    Timestamp,
};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct ConnectParticipantUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続を登録し、割り当てた表示名を返す
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続の ID（Domain Model）
    /// * `outbound` - この接続へのメッセージ送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - 登録成功
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        outbound: Outbound,
    ) -> Result<DisplayName, ConnectError> {
        let display_name = DisplayNameFactory::generate()?;
        let connection = Connection::new(connection_id, display_name.clone(), Timestamp::now());

        self.registry.register(connection, outbound).await?;

        Ok(display_name)
    }
}
