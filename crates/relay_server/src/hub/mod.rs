//! The relay hub: connection admission, identity assignment, broadcast
//! fan-out, and queue promotion.
//!
//! The hub is a single-owner event loop. One task owns the roster, the
//! waiting queue, and the fan-out set, and consumes [`HubEvent`]s from one
//! channel, so every mutation is serialized without locks. Handlers are
//! synchronous and must not block; outbound delivery goes through each
//! connection's bounded channel and never waits on a slow client.

use crate::connection::{ConnectionHandle, ConnectionId};
use relay_protocol::{ClientMessage, Color, PlayerId, Position, ServerMessage, SPAWN_POSITION};
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tracing::{debug, error, info, warn};

/// Lifecycle and traffic events delivered to the hub by connection tasks.
#[derive(Debug)]
pub enum HubEvent {
    /// A WebSocket handshake completed.
    Connected { handle: ConnectionHandle },
    /// A text frame arrived on an open connection.
    Message {
        connection_id: ConnectionId,
        text: String,
    },
    /// The transport reported the connection closed.
    Disconnected { connection_id: ConnectionId },
}

/// An admitted player occupying a roster slot.
#[derive(Debug)]
pub struct Player {
    pub position: Position,
    pub color: Color,
    pub connection: ConnectionId,
}

/// A client waiting for a roster slot.
///
/// The queue keeps the connection that issued the request so promotion can
/// reattach the right client, and so a queued client's disconnect removes
/// its entry instead of leaving the id stranded.
#[derive(Debug)]
struct QueuedClient {
    id: PlayerId,
    connection: ConnectionId,
}

/// The relay hub. One instance per process, driven by [`RelayHub::run`].
pub struct RelayHub {
    max_players: usize,
    /// Admitted players by id. Never grows past `max_players`.
    roster: HashMap<PlayerId, Player>,
    /// FIFO overflow queue, unbounded.
    queue: VecDeque<QueuedClient>,
    /// Every open connection, admitted or queued. The broadcast fan-out set.
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// Reverse index from connection to the roster id it owns.
    players_by_connection: HashMap<ConnectionId, PlayerId>,
    /// Connections scheduled for teardown after the current handler.
    pending_closes: Vec<ConnectionId>,
    events: mpsc::Receiver<HubEvent>,
}

impl RelayHub {
    pub fn new(max_players: usize, events: mpsc::Receiver<HubEvent>) -> Self {
        Self {
            max_players,
            roster: HashMap::new(),
            queue: VecDeque::new(),
            connections: HashMap::new(),
            players_by_connection: HashMap::new(),
            pending_closes: Vec::new(),
            events,
        }
    }

    /// Consume hub events until every sender is gone.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            match event {
                HubEvent::Connected { handle } => self.handle_connect(handle),
                HubEvent::Message {
                    connection_id,
                    text,
                } => self.handle_message(connection_id, &text),
                HubEvent::Disconnected { connection_id } => {
                    self.handle_disconnect(connection_id)
                }
            }
            self.drain_pending_closes();
        }
        debug!("Hub event loop stopped");
    }

    /// Admit the new connection if a roster slot is free, queue it otherwise.
    fn handle_connect(&mut self, handle: ConnectionHandle) {
        let connection_id = handle.id();
        self.connections.insert(connection_id, handle);

        let id = self.fresh_player_id();
        if self.roster.len() < self.max_players {
            self.admit(id, connection_id);
        } else {
            self.queue.push_back(QueuedClient {
                id: id.clone(),
                connection: connection_id,
            });
            info!(
                "Roster full ({} players), queued {} at position {}",
                self.roster.len(),
                id,
                self.queue.len()
            );
            let update = ServerMessage::QueueUpdate {
                queue: self.queue.iter().map(|entry| entry.id.clone()).collect(),
            };
            if let Some(text) = encode(&update) {
                self.send_to(connection_id, &text);
                self.broadcast(&text);
            }
        }
    }

    /// Decode and apply one inbound message. Malformed input is dropped
    /// without a reply and without closing the connection.
    fn handle_message(&mut self, connection_id: ConnectionId, text: &str) {
        let message: ClientMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                debug!(
                    "Dropping malformed message from connection {}: {}",
                    connection_id, e
                );
                return;
            }
        };

        match message {
            ClientMessage::PlayerUpdate { id, position } => {
                match self.roster.get_mut(&id) {
                    Some(player) => player.position = position,
                    None => {
                        // Unknown or still-queued id: trust-the-client relay,
                        // but only roster members move.
                        debug!("Dropping update for non-roster id {}", id);
                        return;
                    }
                }
                // Forward the original frame verbatim.
                self.broadcast(text);
            }
        }
    }

    /// Tear down a connection: roster removal and promotion for admitted
    /// players, queue cleanup for waiting ones. Idempotent.
    fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        if self.connections.remove(&connection_id).is_none() {
            return;
        }

        if let Some(id) = self.players_by_connection.remove(&connection_id) {
            self.roster.remove(&id);
            info!("Player {} left ({} players)", id, self.roster.len());
            if let Some(text) = encode(&ServerMessage::PlayerLeft { id }) {
                self.broadcast(&text);
            }
            self.promote_next();
        } else if let Some(index) = self
            .queue
            .iter()
            .position(|entry| entry.connection == connection_id)
        {
            if let Some(abandoned) = self.queue.remove(index) {
                debug!("Queued client {} left before admission", abandoned.id);
            }
        }
    }

    /// Insert a player for `connection_id`, tell it its identity, and
    /// announce it to everyone.
    fn admit(&mut self, id: PlayerId, connection_id: ConnectionId) {
        let position = SPAWN_POSITION;
        let color = Color::random();
        self.roster.insert(
            id.clone(),
            Player {
                position,
                color,
                connection: connection_id,
            },
        );
        self.players_by_connection.insert(connection_id, id.clone());
        info!(
            "Player {} admitted ({}/{} slots)",
            id,
            self.roster.len(),
            self.max_players
        );

        let assigned = ServerMessage::CurrentPlayerId {
            id: id.clone(),
            position,
            color,
        };
        if let Some(text) = encode(&assigned) {
            self.send_to(connection_id, &text);
        }

        let joined = ServerMessage::PlayerJoined {
            id,
            position,
            color,
        };
        if let Some(text) = encode(&joined) {
            self.broadcast(&text);
        }
    }

    /// Move the next waiting client into the freed roster slot. Entries
    /// whose connection is no longer open are discarded; at most one
    /// promotion happens per freed slot.
    fn promote_next(&mut self) {
        while let Some(next) = self.queue.pop_front() {
            let open = self
                .connections
                .get(&next.connection)
                .map(ConnectionHandle::is_open)
                .unwrap_or(false);
            if !open {
                debug!("Discarding queued id {}: connection gone", next.id);
                continue;
            }
            info!("Promoting {} from queue ({} still waiting)", next.id, self.queue.len());
            self.admit(next.id, next.connection);
            return;
        }
    }

    /// Generate an id that is live in neither the roster nor the queue.
    fn fresh_player_id(&self) -> PlayerId {
        loop {
            let id = PlayerId::generate();
            let queued = self.queue.iter().any(|entry| entry.id == id);
            if !queued && !self.roster.contains_key(&id) {
                return id;
            }
            debug!("Regenerating colliding player id {}", id);
        }
    }

    /// Send to one connection, applying the backpressure policy on failure.
    fn send_to(&mut self, connection_id: ConnectionId, text: &str) {
        let Some(handle) = self.connections.get(&connection_id) else {
            return;
        };
        if !handle.is_open() {
            return;
        }
        match handle.send(Message::text(text)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Connection {} cannot keep up, closing", connection_id);
                self.pending_closes.push(connection_id);
            }
            Err(TrySendError::Closed(_)) => {
                self.pending_closes.push(connection_id);
            }
        }
    }

    /// Fan one already-serialized message out to every open connection.
    /// Failure to reach one recipient never aborts delivery to the rest.
    fn broadcast(&mut self, text: &str) {
        let payload = Utf8Bytes::from(text);
        let mut stale = Vec::new();
        for (&connection_id, handle) in &self.connections {
            if !handle.is_open() {
                continue;
            }
            match handle.send(Message::Text(payload.clone())) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!("Connection {} cannot keep up, closing", connection_id);
                    stale.push(connection_id);
                }
                Err(TrySendError::Closed(_)) => {
                    stale.push(connection_id);
                }
            }
        }
        self.pending_closes.append(&mut stale);
    }

    /// Run disconnect handling for connections the send path gave up on.
    /// Teardown may itself broadcast (and fail more sends), so drain until
    /// quiescent.
    fn drain_pending_closes(&mut self) {
        while let Some(connection_id) = self.pending_closes.pop() {
            self.handle_disconnect(connection_id);
        }
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to serialize outbound message: {}", e);
            None
        }
    }
}
