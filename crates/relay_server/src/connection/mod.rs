//! Connection handling for client WebSockets.
//!
//! Each client gets a connection id at handshake time and a hub-side
//! [`ConnectionHandle`] for outbound delivery. The hub never touches the
//! socket directly; frames flow through a bounded per-connection channel
//! drained by a writer task.

pub mod client;

pub use client::{next_connection_id, ConnectionHandle};

/// Type alias for connection identifiers.
///
/// Connection ids are process-unique and independent of player ids: a
/// connection exists from handshake to close, while a player identity only
/// exists once the hub admits the connection to the roster.
pub type ConnectionId = usize;
