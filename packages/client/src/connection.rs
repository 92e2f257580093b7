//! Single WebSocket connection with reactive state.
//!
//! [`ChatClient`] mirrors what a UI layer needs from one chat connection:
//! a connected flag, the ordered list of received messages, the last error,
//! and `connect` / `disconnect` / `send`. State changes are published through
//! a [`tokio::sync::watch`] channel so a UI can re-render on every change.
//!
//! Failures never surface as `Err` to the caller; they land in
//! [`ClientState::error`] instead.

use std::sync::Arc;

use chatrelay_server::infrastructure::dto::websocket::{ChatMessageDto, OutboundChatDto};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Set when the transport reports an error
pub const CONNECTION_ERROR: &str = "WebSocket connection error";

/// Set when the transport cannot be created
pub const CONNECT_FAILED: &str = "Failed to establish WebSocket connection";

/// Set when `send` is called without an open transport
pub const NOT_CONNECTED: &str = "WebSocket is not connected";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Observable state of a [`ChatClient`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Set when the handshake succeeds; cleared when the reader stops, whether
    /// after a close handshake or right after a transport error
    pub is_connected: bool,
    /// Every message received, oldest first; never pruned
    pub messages: Vec<ChatMessageDto>,
    /// Last user-visible error, cleared on a successful open
    pub error: Option<String>,
}

struct Transport {
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
}

impl Transport {
    /// Stop observing this transport and ask the peer to close it.
    fn retire(self) {
        self.reader.abort();
        let _ = self.outbound.send(Message::Close(None));
    }
}

pub struct ChatClient {
    url: String,
    state: Arc<watch::Sender<ClientState>>,
    transport: Option<Transport>,
}

impl ChatClient {
    /// Create a client for `url` without connecting.
    pub fn new(url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ClientState::default());
        Self {
            url: url.into(),
            state: Arc::new(state),
            transport: None,
        }
    }

    /// Create a client and connect right away. Dropping it disconnects.
    pub async fn mount(url: impl Into<String>) -> Self {
        let mut client = Self::new(url);
        client.connect().await;
        client
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ClientState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_connected
    }

    /// Open a new transport to the configured URL.
    ///
    /// A transport left over from an earlier `connect` is closed first. On
    /// failure the error state is set and `connect` may simply be retried.
    pub async fn connect(&mut self) {
        if let Some(previous) = self.transport.take() {
            previous.retire();
            self.state.send_modify(|state| state.is_connected = false);
        }

        let stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::error!(url = %self.url, "Failed to create WebSocket: {}", e);
                self.state
                    .send_modify(|state| state.error = Some(CONNECT_FAILED.to_string()));
                return;
            }
        };

        self.state.send_modify(|state| {
            state.is_connected = true;
            state.error = None;
        });
        tracing::info!(url = %self.url, "WebSocket connection established");

        let (sink, stream) = stream.split();
        let (outbound, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_frames(sink, rx));
        let reader = tokio::spawn(read_frames(stream, self.state.clone()));

        self.transport = Some(Transport { outbound, reader });
    }

    /// Close the transport if it is open; otherwise do nothing.
    ///
    /// The connected flag drops once the close handshake completes.
    pub fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }
        if let Some(transport) = &self.transport
            && transport.outbound.send(Message::Close(None)).is_err()
        {
            tracing::debug!("Writer already stopped");
        }
    }

    /// Send `text` as a chat message. The server fills in the username and
    /// timestamp. Without an open transport only the error state is set.
    pub fn send(&self, text: &str) {
        let transport = match &self.transport {
            Some(transport) if self.is_connected() => transport,
            _ => {
                self.set_error(NOT_CONNECTED);
                return;
            }
        };

        let frame = match serde_json::to_string(&OutboundChatDto::new(text)) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize outbound message: {}", e);
                return;
            }
        };
        if transport.outbound.send(Message::text(frame)).is_err() {
            self.set_error(NOT_CONNECTED);
        }
    }

    fn set_error(&self, message: &str) {
        self.state
            .send_modify(|state| state.error = Some(message.to_string()));
    }
}

impl Drop for ChatClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

async fn write_frames(
    mut sink: SplitSink<WsStream, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(frame) = rx.recv().await {
        let closing = matches!(frame, Message::Close(_));
        if let Err(e) = sink.send(frame).await {
            tracing::warn!("Failed to write frame: {}", e);
            break;
        }
        if closing {
            break;
        }
    }
}

async fn read_frames(mut stream: SplitStream<WsStream>, state: Arc<watch::Sender<ClientState>>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ChatMessageDto>(text.as_str()) {
                Ok(message) => state.send_modify(|state| state.messages.push(message)),
                Err(e) => tracing::warn!("Failed to parse message: {}", e),
            },
            Ok(Message::Close(frame)) => {
                tracing::debug!(?frame, "Server sent close frame");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                state.send_modify(|state| state.error = Some(CONNECTION_ERROR.to_string()));
                break;
            }
        }
    }

    state.send_modify(|state| state.is_connected = false);
    tracing::info!("WebSocket connection closed");
}
