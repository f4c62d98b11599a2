use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use super::error::{LifecycleError, LifecycleResult};
use super::readiness::ModelSlot;

/// Runs `load` on the blocking pool and installs its result into `slot`.
///
/// On failure the slot is marked `Failed` and the error is returned so the
/// caller can shut the process down.
pub async fn load_into_slot<T, E, F>(slot: Arc<ModelSlot<T>>, load: F) -> LifecycleResult<()>
where
    T: ?Sized + Send + Sync + 'static,
    E: Display + Send + 'static,
    F: FnOnce() -> Result<Arc<T>, E> + Send + 'static,
{
    if !slot.mark_loading() {
        return Err(LifecycleError::AlreadyInstalled);
    }

    let started = Instant::now();
    info!("Model load started");

    let outcome = match tokio::task::spawn_blocking(load).await {
        Ok(Ok(model)) => slot.install(model),
        Ok(Err(e)) => Err(LifecycleError::LoadFailed {
            reason: e.to_string(),
        }),
        Err(e) => Err(LifecycleError::LoadAborted {
            reason: e.to_string(),
        }),
    };

    match &outcome {
        Ok(()) => info!(
            load_ms = started.elapsed().as_millis() as u64,
            "Model ready"
        ),
        Err(e) => {
            error!(error = %e, "Model load failed");
            slot.fail(e.to_string());
        }
    }

    outcome
}
