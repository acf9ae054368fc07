//! Hub-side representation of one client connection.

use super::ConnectionId;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;

static NEXT_CONNECTION_ID: AtomicUsize = AtomicUsize::new(1);

/// Allocate a fresh connection id.
pub fn next_connection_id() -> ConnectionId {
    NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Sending half of a client connection, held by the hub.
///
/// Wraps the bounded channel feeding the connection's writer task. Sends
/// never block: a full buffer is reported to the caller so it can apply the
/// drop-the-slow-client policy instead of stalling the event loop.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<Message>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Message>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Readiness check performed before every send. A closed channel means
    /// the writer task is gone and the transport is closing or closed.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Queue a frame for delivery without blocking.
    pub fn send(&self, message: Message) -> Result<(), TrySendError<Message>> {
        self.sender.try_send(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        let a = next_connection_id();
        let b = next_connection_id();
        assert_ne!(a, b);
    }

    #[test]
    fn handle_reports_closed_channel() {
        let (sender, receiver) = mpsc::channel(1);
        let handle = ConnectionHandle::new(next_connection_id(), sender);
        assert!(handle.is_open());

        drop(receiver);
        assert!(!handle.is_open());
        assert!(handle.send(Message::text("late")).is_err());
    }

    #[test]
    fn full_buffer_is_reported_not_awaited() {
        let (sender, _receiver) = mpsc::channel(1);
        let handle = ConnectionHandle::new(next_connection_id(), sender);

        assert!(handle.send(Message::text("first")).is_ok());
        assert!(matches!(
            handle.send(Message::text("second")),
            Err(TrySendError::Full(_))
        ));
    }
}
