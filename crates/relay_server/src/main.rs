//! Relay server entry point.
//!
//! Wires together argument parsing, logging, configuration, and the accept
//! loop, then runs until a termination signal arrives. The listen port
//! resolves in order: `--listen` flag, `PORT` environment variable, config
//! file.

use anyhow::Result;
use clap::Parser;
use relay_server::{
    config::{self, Args, Config},
    logging, shutdown, RelayServer, ServerConfig,
};
use std::net::SocketAddr;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::setup_logging(&args)?;

    info!("Starting relay server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&args)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    info!("Configuration loaded from: {}", args.config.display());

    let server_config = create_server_config(&config, &args)?;
    log_server_configuration(&server_config);

    let server = RelayServer::bind(server_config).await?;
    let shutdown_receiver = shutdown::setup_shutdown_handler().await;

    tokio::select! {
        result = server.run() => {
            match result {
                Ok(()) => info!("Server stopped normally"),
                Err(e) => {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = shutdown_receiver => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Create server configuration from loaded config and CLI arguments.
fn create_server_config(config: &Config, args: &Args) -> Result<ServerConfig> {
    let port_env = std::env::var("PORT").ok();
    let listen_addr = resolve_listen_addr(config, args, port_env.as_deref())?;
    let max_players = args.max_players.unwrap_or(config.server.max_players);

    Ok(ServerConfig {
        listen_addr,
        max_players,
        outbound_buffer: config.server.outbound_buffer,
        event_queue_capacity: config.server.event_queue_capacity,
    })
}

/// Resolve the listen address: `--listen` wins, then `PORT` applied to the
/// configured host, then the configured address as-is.
fn resolve_listen_addr(config: &Config, args: &Args, port_env: Option<&str>) -> Result<SocketAddr> {
    if let Some(listen) = args.listen.as_deref() {
        return listen
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse listen address {listen}: {e}"));
    }

    if let Some(port) = port_env {
        let port: u16 = port
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse PORT value {port}: {e}"))?;
        let host = config
            .server
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        let addr = format!("{host}:{port}");
        return addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse listen address {addr}: {e}"));
    }

    config
        .server
        .listen_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Failed to parse listen address {}: {e}", config.server.listen_addr))
}

/// Log the final server configuration.
fn log_server_configuration(config: &ServerConfig) {
    info!("Server configuration:");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Max players: {}", config.max_players);
    info!("  Outbound buffer: {} frames", config.outbound_buffer);
    info!("  Event queue capacity: {}", config.event_queue_capacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_server_config_defaults() {
        let config = Config::default();
        let args = Args::default();

        // Port asserted through the env-free path so an ambient PORT
        // variable can't perturb the test.
        let addr = resolve_listen_addr(&config, &args, None).unwrap();
        assert_eq!(addr.port(), 3000);

        let server_config = create_server_config(&config, &args).unwrap();
        assert_eq!(server_config.max_players, 60);
        assert_eq!(server_config.outbound_buffer, 256);
    }

    #[test]
    fn test_create_server_config_with_overrides() {
        let config = Config::default();
        let args = Args {
            listen: Some("127.0.0.1:9090".to_string()),
            max_players: Some(2),
            ..Default::default()
        };

        let server_config = create_server_config(&config, &args).unwrap();
        assert_eq!(server_config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(server_config.max_players, 2);
    }

    #[test]
    fn test_resolve_listen_addr_port_env() {
        let config = Config::default();
        let args = Args::default();

        // PORT applies to the configured host.
        let addr = resolve_listen_addr(&config, &args, Some("8081")).unwrap();
        assert_eq!(addr.port(), 8081);

        // The --listen flag beats PORT.
        let args = Args {
            listen: Some("127.0.0.1:9090".to_string()),
            ..Default::default()
        };
        let addr = resolve_listen_addr(&config, &args, Some("8081")).unwrap();
        assert_eq!(addr.port(), 9090);

        // A non-numeric PORT is an error, not a silent fallback.
        let args = Args::default();
        assert!(resolve_listen_addr(&config, &args, Some("eighty")).is_err());
    }

    #[test]
    fn test_resolve_listen_addr_rejects_garbage() {
        let config = Config::default();
        let args = Args {
            listen: Some("not-an-address".to_string()),
            ..Default::default()
        };

        assert!(resolve_listen_addr(&config, &args, None).is_err());
    }
}
