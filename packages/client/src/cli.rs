//! Line-oriented terminal UI on top of [`ChatClient`].

use std::{thread, time::Duration};

use chatrelay_server::infrastructure::dto::websocket::{ChatMessageDto, MessageType};
use chatrelay_shared::time::{millis_to_clock, parse_iso8601};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot, watch};

use crate::{
    config::ClientConfig,
    connection::{ChatClient, ClientState},
    error::ClientError,
};

const PROMPT: &str = "> ";
const QUIT_COMMAND: &str = "/quit";
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Connect to the relay and run an interactive session until `/quit`,
/// end of input, or the server going away.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let mut client = ChatClient::mount(config.url.clone()).await;
    if !client.is_connected() {
        return Err(ClientError::ConnectFailed { url: config.url });
    }

    let mut printer = tokio::spawn(print_messages(client.subscribe()));

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    // rustyline blocks; a detached thread keeps it from holding up runtime shutdown
    thread::Builder::new()
        .name("readline".to_string())
        .spawn(move || read_lines(ready_tx, line_tx))?;
    ready_rx.await.unwrap_or(Ok(()))?;

    loop {
        tokio::select! {
            line = line_rx.recv() => match line {
                Some(line) if line.trim() == QUIT_COMMAND => break,
                Some(line) if line.trim().is_empty() => {}
                Some(line) => client.send(line.trim()),
                None => break,
            },
            _ = &mut printer => {
                println!("*** Disconnected from {}", client.url());
                return Ok(());
            }
        }
    }

    client.disconnect();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, printer).await.is_err() {
        tracing::debug!("Close handshake did not finish in time");
    }
    Ok(())
}

fn read_lines(
    ready: oneshot::Sender<Result<(), ReadlineError>>,
    lines: mpsc::UnboundedSender<String>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => {
            let _ = ready.send(Ok(()));
            editor
        }
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!("Failed to record history: {}", e);
                }
                if lines.send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

/// Print every new message until the connection closes.
async fn print_messages(mut state: watch::Receiver<ClientState>) {
    let mut printed = 0;
    loop {
        let connected = {
            let snapshot = state.borrow_and_update();
            for message in snapshot.messages.iter().skip(printed) {
                println!("{}", render(message));
            }
            printed = snapshot.messages.len();
            if let Some(error) = &snapshot.error {
                tracing::warn!("{}", error);
            }
            snapshot.is_connected
        };

        if !connected || state.changed().await.is_err() {
            break;
        }
    }
}

/// One display line per message: `[HH:MM:SS] name: text` for chat,
/// `*** text` for system notices.
pub fn render(message: &ChatMessageDto) -> String {
    match message.r#type {
        MessageType::System => format!("*** {}", message.data),
        MessageType::Chat => {
            let clock = parse_iso8601(&message.timestamp)
                .map(millis_to_clock)
                .unwrap_or_else(|| message.timestamp.clone());
            let username = message.username.as_deref().unwrap_or("?");
            format!("[{}] {}: {}", clock, username, message.data)
        }
    }
}
