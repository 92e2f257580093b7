//! Per-connection lifecycle state machine.
//!
//! The socket handler translates transport activity into [`ConnectionEvent`]s
//! and feeds them to a [`ConnectionLifecycle`], one per connection:
//!
//! ```text
//! Connecting --Opened--> Open --Closed--> Closed
//!                         |  ^
//!                Inbound /   \ Errored (deregister, no notice)
//! ```

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, ConnectionId, ConnectionRegistry, DisplayName, Outbound, Timestamp},
    infrastructure::dto::websocket::ChatMessageDto,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, SendMessageError,
        SendMessageUseCase,
    },
};

/// Transport activity observed on one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Upgrade accepted
    Opened,
    /// Text frame received
    Inbound(String),
    /// Protocol violation on the transport; a close always follows
    Errored(String),
    /// Transport closed
    Closed,
}

/// Where a connection is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Connecting,
    Open,
    Closed,
}

/// Drives one connection's use cases from its transport events
pub struct ConnectionLifecycle {
    connection_id: ConnectionId,
    outbound: Outbound,
    state: LifecycleState,
    display_name: Option<DisplayName>,
    connect: ConnectParticipantUseCase,
    send: SendMessageUseCase,
    disconnect: DisconnectParticipantUseCase,
}

impl ConnectionLifecycle {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        connection_id: ConnectionId,
        outbound: Outbound,
    ) -> Self {
        Self {
            connection_id,
            outbound,
            state: LifecycleState::Connecting,
            display_name: None,
            connect: ConnectParticipantUseCase::new(registry.clone()),
            send: SendMessageUseCase::new(registry.clone()),
            disconnect: DisconnectParticipantUseCase::new(registry),
        }
    }

    /// Name assigned on open, if the connection got that far
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Apply one event and return the resulting state.
    pub async fn handle(&mut self, event: ConnectionEvent) -> LifecycleState {
        let connection_id = self.connection_id;
        match (self.state, event) {
            (LifecycleState::Connecting, ConnectionEvent::Opened) => self.open().await,
            (LifecycleState::Open, ConnectionEvent::Inbound(text)) => {
                match self.send.execute(connection_id, &text).await {
                    Ok(delivered) => {
                        tracing::debug!(%connection_id, delivered, "Relayed chat message");
                    }
                    Err(SendMessageError::MalformedFrame(reason)) => {
                        tracing::warn!(%connection_id, "Discarding malformed frame: {}", reason);
                    }
                    Err(e) => {
                        tracing::warn!(%connection_id, "Failed to relay message: {}", e);
                    }
                }
            }
            (LifecycleState::Open, ConnectionEvent::Errored(reason)) => {
                tracing::error!(%connection_id, "WebSocket error: {}", reason);
                self.disconnect.discard(connection_id).await;
            }
            (LifecycleState::Open, ConnectionEvent::Closed) => {
                if let Some(name) = self.disconnect.execute(connection_id).await {
                    let remaining = self.disconnect.count_remaining().await;
                    tracing::info!(
                        %connection_id,
                        display_name = %name,
                        remaining,
                        "Connection closed"
                    );
                } else {
                    tracing::info!(%connection_id, "Connection closed after transport error");
                }
                self.state = LifecycleState::Closed;
            }
            (LifecycleState::Connecting, ConnectionEvent::Closed | ConnectionEvent::Errored(_)) => {
                self.state = LifecycleState::Closed;
            }
            (state, event) => {
                tracing::debug!(%connection_id, ?state, ?event, "Ignoring event");
            }
        }
        self.state
    }

    async fn open(&mut self) {
        let connection_id = self.connection_id;

        // Welcome goes to this connection only, queued ahead of any broadcast
        // that can reach it once registered
        match ChatMessageDto::encode(&ChatMessage::welcome(Timestamp::now())) {
            Ok(text) => {
                if self.outbound.send(text).is_err() {
                    tracing::warn!(%connection_id, "Failed to queue welcome message");
                }
            }
            Err(e) => tracing::error!("Failed to serialize welcome message: {}", e),
        }

        let display_name = match self
            .connect
            .execute(connection_id, self.outbound.clone())
            .await
        {
            Ok(name) => name,
            Err(e) => {
                tracing::error!(%connection_id, "Failed to register connection: {}", e);
                self.state = LifecycleState::Closed;
                return;
            }
        };
        tracing::info!(%connection_id, display_name = %display_name, "New connection established");
        self.display_name = Some(display_name);
        self.state = LifecycleState::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, MockConnectionRegistry},
        infrastructure::repository::InMemoryConnectionRegistry,
        usecase::test_support::drain,
    };
    use tokio::sync::mpsc;

    struct Peer {
        lifecycle: ConnectionLifecycle,
        rx: mpsc::UnboundedReceiver<String>,
    }

    async fn open_peer(registry: &Arc<InMemoryConnectionRegistry>) -> Peer {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut lifecycle =
            ConnectionLifecycle::new(registry.clone(), ConnectionIdFactory::generate(), tx);
        assert_eq!(
            lifecycle.handle(ConnectionEvent::Opened).await,
            LifecycleState::Open
        );
        Peer { lifecycle, rx }
    }

    #[tokio::test]
    async fn test_open_registers_and_welcomes_only_self() {
        // テスト項目: 接続すると登録され、welcome は本人にだけ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        drain(&mut alice.rx);

        // when (操作):
        let mut bob = open_peer(&registry).await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 2);
        let bob_frames = drain(&mut bob.rx);
        assert_eq!(bob_frames.len(), 1);
        assert_eq!(bob_frames[0]["type"], "system");
        assert_eq!(bob_frames[0]["data"], "Welcome to the chat!");
        assert!(bob_frames[0].get("username").is_none());
        assert!(drain(&mut alice.rx).is_empty());
        assert!(bob.lifecycle.display_name().is_some());
    }

    #[tokio::test]
    async fn test_inbound_is_broadcast_with_sender_name() {
        // テスト項目: 受信したメッセージは送信者名付きで全員に届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        let mut bob = open_peer(&registry).await;
        drain(&mut alice.rx);
        drain(&mut bob.rx);
        let alice_name = alice.lifecycle.display_name().unwrap().to_string();

        // when (操作):
        alice
            .lifecycle
            .handle(ConnectionEvent::Inbound(r#"{"data":"hi"}"#.to_string()))
            .await;

        // then (期待する結果):
        for rx in [&mut alice.rx, &mut bob.rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "chat");
            assert_eq!(frames[0]["data"], "hi");
            assert_eq!(frames[0]["username"], alice_name.as_str());
        }
    }

    #[tokio::test]
    async fn test_malformed_inbound_keeps_connection_open() {
        // テスト項目: 不正なフレームは破棄され、接続は開いたまま
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        let mut bob = open_peer(&registry).await;
        drain(&mut alice.rx);
        drain(&mut bob.rx);

        // when (操作):
        let state = alice
            .lifecycle
            .handle(ConnectionEvent::Inbound("{broken".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(state, LifecycleState::Open);
        assert!(drain(&mut alice.rx).is_empty());
        assert!(drain(&mut bob.rx).is_empty());
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_close_broadcasts_departure() {
        // テスト項目: close すると残りの接続に退出通知が届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        let mut bob = open_peer(&registry).await;
        drain(&mut alice.rx);
        let bob_name = bob.lifecycle.display_name().unwrap().to_string();

        // when (操作):
        let state = bob.lifecycle.handle(ConnectionEvent::Closed).await;

        // then (期待する結果):
        assert_eq!(state, LifecycleState::Closed);
        let frames = drain(&mut alice.rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "system");
        assert_eq!(frames[0]["data"], format!("{bob_name} left the chat"));
        assert_eq!(registry.count().await, 1);
        drain(&mut bob.rx);
    }

    #[tokio::test]
    async fn test_error_then_close_sends_no_departure() {
        // テスト項目: error 後の close では退出通知は送られない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        let mut bob = open_peer(&registry).await;
        drain(&mut alice.rx);

        // when (操作):
        let after_error = bob
            .lifecycle
            .handle(ConnectionEvent::Errored("unmasked frame".to_string()))
            .await;
        let after_close = bob.lifecycle.handle(ConnectionEvent::Closed).await;

        // then (期待する結果):
        assert_eq!(after_error, LifecycleState::Open);
        assert_eq!(after_close, LifecycleState::Closed);
        assert_eq!(registry.count().await, 1);
        assert!(drain(&mut alice.rx).is_empty());
        drain(&mut bob.rx);
    }

    #[tokio::test]
    async fn test_events_after_close_are_ignored() {
        // テスト項目: Closed 後のイベントは無視される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice = open_peer(&registry).await;
        let mut bob = open_peer(&registry).await;
        alice.lifecycle.handle(ConnectionEvent::Closed).await;
        drain(&mut bob.rx);

        // when (操作):
        let state = alice
            .lifecycle
            .handle(ConnectionEvent::Inbound(r#"{"data":"late"}"#.to_string()))
            .await;
        alice.lifecycle.handle(ConnectionEvent::Closed).await;

        // then (期待する結果):
        assert_eq!(state, LifecycleState::Closed);
        assert!(drain(&mut bob.rx).is_empty());
    }

    #[tokio::test]
    async fn test_close_before_open_touches_nothing() {
        // テスト項目: Opened 前の close は登録も通知もしない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut lifecycle =
            ConnectionLifecycle::new(registry.clone(), ConnectionIdFactory::generate(), tx);

        // when (操作):
        let state = lifecycle.handle(ConnectionEvent::Closed).await;

        // then (期待する結果):
        assert_eq!(state, LifecycleState::Closed);
        assert_eq!(registry.count().await, 0);
        assert!(lifecycle.display_name().is_none());
    }

    #[tokio::test]
    async fn test_welcome_is_queued_before_broadcasts_can_arrive() {
        // テスト項目: 登録直後に他接続のブロードキャストが割り込んでも welcome が先頭に届く
        // given (前提条件): 登録と同時に送信キューへチャットを積むレジストリ
        let mut registry = MockConnectionRegistry::new();
        registry.expect_register().times(1).returning(|_, outbound| {
            let _ = outbound.send(r#"{"type":"chat","data":"early"}"#.to_string());
            Ok(())
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut lifecycle =
            ConnectionLifecycle::new(Arc::new(registry), ConnectionIdFactory::generate(), tx);

        // when (操作):
        let state = lifecycle.handle(ConnectionEvent::Opened).await;

        // then (期待する結果):
        assert_eq!(state, LifecycleState::Open);
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["data"], "Welcome to the chat!");
        assert_eq!(frames[1]["data"], "early");
    }
}
