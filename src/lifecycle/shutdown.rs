use std::sync::Arc;

use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;

use super::error::{LifecycleError, LifecycleResult};

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Serves `app` until a shutdown signal arrives or the model load fails.
///
/// Returns the load error in the second case so `main` exits non-zero.
pub async fn serve_until_shutdown(
    listener: TcpListener,
    app: Router,
    load: JoinHandle<LifecycleResult<()>>,
) -> LifecycleResult<()> {
    let failure: Arc<Mutex<Option<LifecycleError>>> = Arc::new(Mutex::new(None));

    let trigger = {
        let failure = Arc::clone(&failure);
        async move {
            tokio::select! {
                _ = shutdown_signal() => {}
                outcome = load => {
                    let outcome = outcome.unwrap_or_else(|e| {
                        Err(LifecycleError::LoadAborted { reason: e.to_string() })
                    });
                    match outcome {
                        Ok(()) => shutdown_signal().await,
                        Err(e) => {
                            tracing::error!(error = %e, "Shutting down after failed model load");
                            *failure.lock() = Some(e);
                        }
                    }
                }
            }
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(trigger)
        .await?;

    match failure.lock().take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
