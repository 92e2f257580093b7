//! Test fixtures shared by the integration tests.
//!
//! `TestServer` runs the real router in-process on an ephemeral port, so
//! tests can run in parallel and inspect the registry directly.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chatrelay_server::ui::{serve, state::AppState};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for a frame that is expected to arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// How long to watch for a frame that must not arrive
pub const SILENCE_WINDOW: Duration = Duration::from_millis(300);

pub struct TestServer {
    addr: SocketAddr,
    pub state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(AppState::in_memory());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server_state = state.clone();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = serve(listener, server_state, shutdown).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub fn ws_url_with_path(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Connect and consume the welcome frame.
    pub async fn join(&self) -> WsClient {
        let mut ws = self.connect().await;
        let welcome = recv_json(&mut ws).await;
        assert_eq!(welcome["type"], "system");
        assert_eq!(welcome["data"], "Welcome to the chat!");
        ws
    }

    /// Complete the upgrade by hand and return the bare TCP stream, so a test
    /// can write frames tungstenite would refuse to produce.
    pub async fn raw_handshake(&self) -> TcpStream {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect to test server");
        let request = format!(
            "GET / HTTP/1.1\r\n\
             Host: {}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
             Sec-WebSocket-Version: 13\r\n\r\n",
            self.addr
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("Failed to send upgrade request");

        let mut response = Vec::new();
        let mut byte = [0u8; 1];
        while !response.ends_with(b"\r\n\r\n") {
            let read = tokio::time::timeout(RECV_TIMEOUT, stream.read(&mut byte))
                .await
                .expect("Timed out waiting for upgrade response")
                .expect("Failed to read upgrade response");
            assert!(read > 0, "Connection closed during upgrade");
            response.push(byte[0]);
        }
        assert!(
            response.starts_with(b"HTTP/1.1 101"),
            "Upgrade rejected: {}",
            String::from_utf8_lossy(&response)
        );
        stream
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect to test server");
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Next text frame parsed as JSON; panics on timeout or close.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection ended")
            .expect("WebSocket error");
        match frame {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Close(frame) => panic!("Connection closed: {frame:?}"),
            _ => continue,
        }
    }
}

/// Assert no text frame arrives within the silence window.
pub async fn assert_silent(ws: &mut WsClient) {
    let deadline = tokio::time::Instant::now() + SILENCE_WINDOW;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Text(text)))) => panic!("Unexpected frame: {text}"),
            Ok(Some(Ok(_))) => continue,
            Ok(other) => panic!("Connection ended unexpectedly: {other:?}"),
        }
    }
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::text(text))
        .await
        .expect("Failed to send frame");
}

pub async fn send_chat(ws: &mut WsClient, data: &str) {
    send_text(ws, &serde_json::json!({ "data": data }).to_string()).await;
}
