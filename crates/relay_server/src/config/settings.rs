//! Configuration settings structures.

use serde::{Deserialize, Serialize};

/// Default listen port. Overridable by the `PORT` environment variable or
/// the `--listen` flag.
pub const DEFAULT_PORT: u16 = 3000;

/// Default roster capacity.
pub const DEFAULT_MAX_PLAYERS: usize = 60;

/// Main configuration structure.
///
/// Serialized to/from TOML for the configuration file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Server-specific settings
    pub server: ServerSettings,
}

/// Server configuration settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerSettings {
    /// Network address to bind the server to
    ///
    /// Format: "IP:PORT" (e.g., "127.0.0.1:3000" for localhost,
    /// "0.0.0.0:3000" for all interfaces)
    pub listen_addr: String,

    /// Maximum number of concurrently admitted players
    ///
    /// Connections beyond this limit are placed in the waiting queue and
    /// admitted in FIFO order as slots free up.
    pub max_players: usize,

    /// Per-connection outbound frame buffer
    ///
    /// A client that falls this many frames behind the broadcast stream is
    /// disconnected rather than allowed to stall the hub.
    pub outbound_buffer: usize,

    /// Capacity of the hub's event queue
    pub event_queue_capacity: usize,
}

impl Default for Config {
    /// Sensible defaults that work out of the box: port 3000, a 60-player
    /// roster, and modest buffering.
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
                max_players: DEFAULT_MAX_PLAYERS,
                outbound_buffer: 256,
                event_queue_capacity: 1024,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.server.max_players, 60);
        assert_eq!(config.server.outbound_buffer, 256);
        assert_eq!(config.server.event_queue_capacity, 1024);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.server.listen_addr, deserialized.server.listen_addr);
        assert_eq!(config.server.max_players, deserialized.server.max_players);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[server]
listen_addr = "0.0.0.0:3000"
max_players = 60
outbound_buffer = 256
event_queue_capacity = 1024
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.max_players, 60);
        assert_eq!(config.server.outbound_buffer, 256);
    }
}
