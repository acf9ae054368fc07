//! Server orchestration: the TCP accept loop and per-connection handlers.

pub mod core;
pub mod handlers;

pub use core::{RelayServer, ServerConfig};
