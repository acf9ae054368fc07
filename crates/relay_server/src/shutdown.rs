//! Graceful shutdown handling.
//!
//! Cross-platform signal handling: the returned receiver fires once when a
//! termination signal arrives.

use tokio::sync::oneshot;
use tracing::info;

/// Set up a shutdown signal handler.
///
/// # Platform Support
/// * Unix/Linux: Handles SIGINT (Ctrl+C) and SIGTERM signals
/// * Windows: Handles Ctrl+C events
///
/// # Returns
/// * `oneshot::Receiver<()>` - Receiver that will be triggered on shutdown signal
pub async fn setup_shutdown_handler() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!("Failed to create SIGINT handler: {}", e);
                    return;
                }
            };
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!("Failed to create SIGTERM handler: {}", e);
                    return;
                }
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("SIGINT received - initiating graceful shutdown");
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM received - initiating graceful shutdown");
                }
            }
        }

        #[cfg(windows)]
        {
            use tokio::signal::windows::ctrl_c;

            let mut ctrl_c = match ctrl_c() {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!("Failed to create Ctrl+C handler: {}", e);
                    return;
                }
            };

            ctrl_c.recv().await;
            info!("Ctrl+C received - initiating graceful shutdown");
        }

        let _ = tx.send(());
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_shutdown_handler_creation() {
        let shutdown_rx = setup_shutdown_handler().await;

        // Not yet triggered: no signal was sent.
        let result = timeout(Duration::from_millis(10), shutdown_rx).await;
        assert!(result.is_err());
    }
}
