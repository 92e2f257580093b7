//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ConnectionId, RegistryError, ValueObjectError};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The connection id is already in the registry
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A generated display name failed validation
    #[error("Generated display name is invalid: {0}")]
    DisplayName(#[from] ValueObjectError),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Inbound frame is not JSON or has no string `data` field
    #[error("Malformed inbound frame: {0}")]
    MalformedFrame(String),

    /// Sender is not in the registry
    #[error("Connection '{0}' is not registered")]
    NotRegistered(ConnectionId),
}
