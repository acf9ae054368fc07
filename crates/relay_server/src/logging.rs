//! Logging system setup.
//!
//! Initializes the tracing-based logging used throughout the server.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Args;

/// Initialize the logging system.
///
/// The base level comes from the `--debug` flag; the `RUST_LOG` environment
/// variable overrides it entirely (e.g., "debug", "relay_server=trace").
pub fn setup_logging(args: &Args) -> Result<()> {
    let level = if args.debug { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_setup() {
        let args = Args::default();

        // The global subscriber can only be installed once per process, so
        // only the first of these calls can succeed; neither may panic.
        let result = setup_logging(&args);
        assert!(result.is_ok() || result.is_err());
    }
}
