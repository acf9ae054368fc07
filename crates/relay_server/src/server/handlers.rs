//! Per-connection WebSocket handling.
//!
//! Each accepted socket gets a reader loop (this function) and a spawned
//! writer task. The reader translates transport frames into [`HubEvent`]s;
//! the writer drains the hub's outbound channel into the socket and closes
//! it once the hub drops the connection's handle.

use crate::{
    connection::{next_connection_id, ConnectionHandle},
    error::ServerError,
    hub::HubEvent,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    events: mpsc::Sender<HubEvent>,
    outbound_buffer: usize,
) -> Result<(), ServerError> {
    let ws_stream = accept_async(stream).await.map_err(|e| {
        ServerError::Network(format!("WebSocket handshake failed for {addr}: {e}"))
    })?;

    let (mut ws_sink, mut ws_receiver) = ws_stream.split();
    let connection_id = next_connection_id();
    let (sender, mut outbound) = mpsc::channel::<Message>(outbound_buffer);
    let handle = ConnectionHandle::new(connection_id, sender);
    let pong_handle = handle.clone();

    if events.send(HubEvent::Connected { handle }).await.is_err() {
        // Hub already gone; the process is shutting down.
        return Ok(());
    }
    info!("Connection {} established from {}", connection_id, addr);

    // Writer: ends when the hub drops its last handle or the socket dies.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if ws_sink.send(message).await.is_err() {
                break;
            }
        }
        let _ = ws_sink.send(Message::Close(None)).await;
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let event = HubEvent::Message {
                    connection_id,
                    text: text.as_str().to_owned(),
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Connection {} requested close", connection_id);
                break;
            }
            Ok(Message::Ping(data)) => {
                // Answered through the outbound channel so the writer task
                // stays the only socket writer.
                let _ = pong_handle.send(Message::Pong(data));
            }
            Ok(Message::Pong(_)) => {}
            Err(e) => {
                debug!("WebSocket error for connection {}: {}", connection_id, e);
                break;
            }
            _ => {
                warn!("Unsupported frame from connection {}", connection_id);
            }
        }
    }

    let _ = events.send(HubEvent::Disconnected { connection_id }).await;
    drop(pong_handle);
    let _ = writer.await;
    info!("Connection {} from {} closed", connection_id, addr);
    Ok(())
}
