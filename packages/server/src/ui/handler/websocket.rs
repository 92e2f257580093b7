//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, error::ProtocolError};

use crate::{
    domain::ConnectionIdFactory,
    ui::{
        lifecycle::{ConnectionEvent, ConnectionLifecycle, LifecycleState},
        state::AppState,
    },
};

/// How long the writer may keep flushing queued frames after the reader ended
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (mut sender, mut receiver) = socket.split();

    // Frames queued for this client (welcome + broadcasts)
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut lifecycle = ConnectionLifecycle::new(state.registry.clone(), connection_id, tx);
    if lifecycle.handle(ConnectionEvent::Opened).await != LifecycleState::Open {
        return;
    }

    // Started only once registered, so a client that has seen its welcome
    // is already counted
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            sender.send(Message::Text(text.into())).await?;
        }
        sender.close().await
    });

    let mut writer_finished = false;
    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    lifecycle
                        .handle(ConnectionEvent::Inbound(text.as_str().to_owned()))
                        .await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(%connection_id, "Client closed the connection");
                    break;
                }
                Some(Ok(_)) => {
                    // Binary and ping/pong frames carry no chat payload
                }
                Some(Err(e)) => {
                    let error = e.into_inner();
                    if is_connection_lost(&*error) {
                        tracing::debug!(%connection_id, "Connection lost: {}", error);
                    } else {
                        lifecycle.handle(ConnectionEvent::Errored(error.to_string())).await;
                    }
                    break;
                }
            },
            result = &mut send_task => {
                writer_finished = true;
                match result {
                    Ok(Ok(())) => tracing::debug!(%connection_id, "Writer stopped"),
                    Ok(Err(e)) => tracing::debug!(%connection_id, "Failed to write frame: {}", e),
                    Err(e) => tracing::warn!(%connection_id, "Writer task failed: {}", e),
                }
                break;
            }
        }
    }

    lifecycle.handle(ConnectionEvent::Closed).await;

    // Dropping the last sender lets the writer flush and finish the close handshake
    drop(lifecycle);
    if !writer_finished && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task).await.is_err()
    {
        tracing::debug!(%connection_id, "Writer did not drain in time");
        send_task.abort();
    }
}

/// Whether a read error means the peer went away (TCP reset, EOF without a
/// close frame, I/O failure) rather than broke the protocol.
///
/// Errors from an unknown source count as a lost connection.
fn is_connection_lost(error: &(dyn std::error::Error + 'static)) -> bool {
    match error.downcast_ref::<WsError>() {
        Some(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))
        | Some(WsError::ConnectionClosed | WsError::AlreadyClosed | WsError::Io(_)) => true,
        Some(_) => false,
        None => true,
    }
}
