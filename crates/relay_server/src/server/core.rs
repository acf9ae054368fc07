//! Core relay server implementation.
//!
//! [`RelayServer`] binds the listen socket, owns the hub task, and accepts
//! WebSocket connections for the lifetime of the process. All game-facing
//! behavior lives in the hub; this module is transport plumbing only.

use crate::{error::ServerError, hub::RelayHub, server::handlers::handle_connection};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Resolved runtime configuration for the relay server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listen socket binds to.
    pub listen_addr: SocketAddr,

    /// Roster capacity. Connections beyond this wait in the FIFO queue.
    pub max_players: usize,

    /// Per-connection outbound frame buffer. A client that falls this far
    /// behind the broadcast stream is disconnected.
    pub outbound_buffer: usize,

    /// Capacity of the hub's inbound event channel.
    pub event_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], crate::config::DEFAULT_PORT)),
            max_players: crate::config::DEFAULT_MAX_PLAYERS,
            outbound_buffer: 256,
            event_queue_capacity: 1024,
        }
    }
}

/// The relay server: one hub, one listener, one task per connection.
pub struct RelayServer {
    config: ServerConfig,
    listener: TcpListener,
}

impl RelayServer {
    /// Bind the listen socket. A bind failure is fatal and propagates to
    /// the caller.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.listen_addr).await.map_err(|e| {
            ServerError::Network(format!("Failed to bind {}: {e}", config.listen_addr))
        })?;
        Ok(Self { config, listener })
    }

    /// The actual bound address. Differs from the configured one when
    /// binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener
            .local_addr()
            .map_err(|e| ServerError::Network(format!("Failed to read local address: {e}")))
    }

    /// Spawn the hub and accept connections until the listener fails or the
    /// future is dropped by the caller's shutdown select.
    pub async fn run(self) -> Result<(), ServerError> {
        let (events, receiver) = mpsc::channel(self.config.event_queue_capacity);
        let hub = RelayHub::new(self.config.max_players, receiver);
        tokio::spawn(hub.run());

        info!(
            "🚀 Relay server listening on {} (max {} players)",
            self.local_addr()?,
            self.config.max_players
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let events = events.clone();
                    let outbound_buffer = self.config.outbound_buffer;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr, events, outbound_buffer).await
                        {
                            error!("Connection error: {:?}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}
