//! Wire-format types for the multiplayer relay server.
//!
//! Everything a client and the relay exchange is a JSON text message tagged
//! with a `type` field. The shapes here are the compatibility contract with
//! deployed game clients, so field and tag spellings are load-bearing and
//! covered by tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Identifiers
// ============================================================================

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Unique identifier for players.
///
/// A short random alphanumeric string, serialized as a bare JSON string.
/// Generation does not check for collisions; the roster owner is expected
/// to regenerate if an id is already live.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Game Types
// ============================================================================

/// Where every player appears when admitted.
pub const SPAWN_POSITION: Position = Position {
    x: 0.0,
    y: 0.5,
    z: 0.0,
};

/// 3D position. Fully client-authoritative after admission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Player display color, channels in `[0, 1)`.
///
/// Assigned once at admission and immutable for the life of the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Sample a uniform random color.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }
}

// ============================================================================
// Wire Messages
// ============================================================================

/// Messages a client sends to the relay.
///
/// Anything that does not decode into one of these shapes is dropped by the
/// hub without a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Position report for an admitted player. Forwarded verbatim to
    /// every connection; the relay applies no validation to the position.
    PlayerUpdate { id: PlayerId, position: Position },
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Directed to a connection on admission, carrying its assigned identity.
    CurrentPlayerId {
        id: PlayerId,
        position: Position,
        color: Color,
    },
    /// Broadcast when a player is admitted or promoted from the queue.
    PlayerJoined {
        id: PlayerId,
        position: Position,
        color: Color,
    },
    /// Broadcast when an admitted player disconnects.
    PlayerLeft { id: PlayerId },
    /// The full waiting queue, sent when a connection is queued.
    QueueUpdate { queue: Vec<PlayerId> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_ids_are_short_and_alphanumeric() {
        for _ in 0..100 {
            let id = PlayerId::generate();
            assert_eq!(id.as_str().len(), 9);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn colors_stay_in_unit_range() {
        for _ in 0..100 {
            let color = Color::random();
            assert!((0.0..1.0).contains(&color.r));
            assert!((0.0..1.0).contains(&color.g));
            assert!((0.0..1.0).contains(&color.b));
        }
    }

    #[test]
    fn current_player_id_wire_format() {
        let message = ServerMessage::CurrentPlayerId {
            id: PlayerId::from("k3j9fq02z"),
            position: SPAWN_POSITION,
            color: Color {
                r: 0.25,
                g: 0.5,
                b: 0.75,
            },
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "currentPlayerId",
                "id": "k3j9fq02z",
                "position": {"x": 0.0, "y": 0.5, "z": 0.0},
                "color": {"r": 0.25, "g": 0.5, "b": 0.75},
            })
        );
    }

    #[test]
    fn player_left_wire_format() {
        let message = ServerMessage::PlayerLeft {
            id: PlayerId::from("k3j9fq02z"),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"type": "playerLeft", "id": "k3j9fq02z"})
        );
    }

    #[test]
    fn queue_update_wire_format() {
        let message = ServerMessage::QueueUpdate {
            queue: vec![PlayerId::from("aaa111bbb"), PlayerId::from("ccc222ddd")],
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"type": "queueUpdate", "queue": ["aaa111bbb", "ccc222ddd"]})
        );
    }

    #[test]
    fn player_update_decodes() {
        let text = r#"{"type":"playerUpdate","id":"k3j9fq02z","position":{"x":1.0,"y":2.0,"z":3.0}}"#;
        let ClientMessage::PlayerUpdate { id, position } =
            serde_json::from_str(text).expect("valid playerUpdate");
        assert_eq!(id.as_str(), "k3j9fq02z");
        assert_eq!(position, Position::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn unknown_message_types_are_rejected() {
        let text = r#"{"type":"chatMessage","body":"hi"}"#;
        assert!(serde_json::from_str::<ClientMessage>(text).is_err());
    }
}
