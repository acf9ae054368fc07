//! # Relay Server - Multiplayer Broadcast Hub
//!
//! A small real-time relay for multiplayer game clients: a WebSocket
//! broadcast hub with a capacity-bounded player roster and a FIFO waiting
//! queue. The server performs no game logic beyond admission bookkeeping —
//! it assigns identities, fans client position updates out to everyone, and
//! promotes waiting clients when a roster slot frees up.
//!
//! ## Architecture Overview
//!
//! * **Hub** — a single-owner event loop holding the roster, queue, and
//!   fan-out set. All state mutation is serialized through one channel, so
//!   no locks exist anywhere in the server.
//! * **Connections** — one reader loop and one writer task per client.
//!   Readers translate WebSocket frames into hub events; writers drain a
//!   bounded per-connection buffer so a slow client never stalls the hub.
//! * **Server** — the TCP accept loop tying the two together.
//!
//! ## Message Flow
//!
//! 1. Client connects; the hub admits it (directed `currentPlayerId`,
//!    broadcast `playerJoined`) or queues it (`queueUpdate`).
//! 2. Admitted clients stream `playerUpdate` messages; the hub stores the
//!    reported position and re-broadcasts the frame verbatim.
//! 3. On disconnect the hub broadcasts `playerLeft` and promotes the next
//!    waiting client into the freed slot.
//!
//! Malformed input is never fatal: undecodable frames are logged and
//! dropped with the connection left open.

// Re-export core types and functions for easy access
pub use config::{Args, Config};
pub use error::ServerError;
pub use hub::{HubEvent, RelayHub};
pub use server::{RelayServer, ServerConfig};

// Public module declarations
pub mod config;
pub mod connection;
pub mod error;
pub mod hub;
pub mod logging;
pub mod server;
pub mod shutdown;
