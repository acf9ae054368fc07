//! Configuration for the relay server.
//!
//! Handles command-line arguments, the TOML configuration file, and the
//! defaults used when neither is present.

pub mod args;
pub mod settings;

pub use args::Args;
pub use settings::{Config, ServerSettings, DEFAULT_MAX_PLAYERS, DEFAULT_PORT};

use anyhow::Result;
use tracing::{info, warn};

/// Load configuration from file or create default configuration.
///
/// If the file doesn't exist, the default configuration is written out so
/// operators have a template to edit, and the defaults are returned.
///
/// # Errors
/// * Returns error if file I/O operations fail
/// * Returns error if TOML parsing fails
pub async fn load_config(args: &Args) -> Result<Config> {
    if args.config.exists() {
        let config_str = tokio::fs::read_to_string(&args.config).await?;
        match toml::de::from_str::<Config>(&config_str) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file {}: {}", args.config.display(), e);
                Err(e.into())
            }
        }
    } else {
        warn!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );

        let default_config = Config::default();
        let config_str = toml::to_string_pretty(&default_config)?;
        tokio::fs::write(&args.config, config_str).await?;
        info!("Created default configuration file: {}", args.config.display());

        Ok(default_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let args = Args {
            config: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        // Delete the file to test default creation
        drop(temp_file);

        let config = load_config(&args).await.unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.server.max_players, 60);
        assert!(args.config.exists());

        let _ = std::fs::remove_file(&args.config);
    }

    #[tokio::test]
    async fn test_load_config_existing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[server]
listen_addr = "127.0.0.1:9090"
max_players = 2
outbound_buffer = 64
event_queue_capacity = 128
        "#;

        temp_file.write_all(config_content.as_bytes()).unwrap();

        let args = Args {
            config: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        let config = load_config(&args).await.unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9090");
        assert_eq!(config.server.max_players, 2);
        assert_eq!(config.server.outbound_buffer, 64);
    }

    #[tokio::test]
    async fn test_load_config_rejects_bad_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[server\nnope").unwrap();

        let args = Args {
            config: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(load_config(&args).await.is_err());
    }
}
