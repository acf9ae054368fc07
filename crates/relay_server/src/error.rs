//! Server error types.

use thiserror::Error;

/// Errors surfaced by the relay server.
///
/// Malformed client input is deliberately not represented here: the hub's
/// policy is to log and drop bad messages, never to fail the connection.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Connection, binding, and protocol failures.
    #[error("Network error: {0}")]
    Network(String),

    /// Broken invariants inside the server.
    #[error("Internal error: {0}")]
    Internal(String),
}
