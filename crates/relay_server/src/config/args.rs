//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the relay server.
///
/// These override configuration file settings where provided.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    ///
    /// If the file doesn't exist, a default configuration will be created.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Server listen address
    ///
    /// Overrides both the configuration file and the PORT environment
    /// variable. Format: "IP:PORT" (e.g., "0.0.0.0:3000").
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Maximum number of admitted players
    #[arg(long)]
    pub max_players: Option<usize>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.toml"),
            listen: None,
            debug: false,
            max_players: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::default();
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(!args.debug);
        assert!(args.listen.is_none());
        assert!(args.max_players.is_none());
    }
}
