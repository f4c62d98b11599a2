use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use super::error::{LifecycleError, LifecycleResult};

/// Where a [`ModelSlot`] is in its one-way lifecycle.
///
/// `Uninitialized → Loading → Ready | Failed`. There are no transitions out of
/// `Ready` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Readiness {
    Uninitialized = 0,
    Loading = 1,
    Ready = 2,
    Failed = 3,
}

impl Readiness {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Readiness::Loading,
            2 => Readiness::Ready,
            3 => Readiness::Failed,
            _ => Readiness::Uninitialized,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Uninitialized => "uninitialized",
            Readiness::Loading => "loading",
            Readiness::Ready => "ready",
            Readiness::Failed => "failed",
        }
    }

    pub fn is_ready(self) -> bool {
        self == Readiness::Ready
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-once owner of a loaded model plus its readiness flag.
///
/// Handlers call [`ModelSlot::get`] on every request; it never blocks.
pub struct ModelSlot<T: ?Sized> {
    state: AtomicU8,
    model: OnceLock<Arc<T>>,
    failure: OnceLock<String>,
}

impl<T: ?Sized> Default for ModelSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ModelSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSlot")
            .field("readiness", &self.readiness())
            .field("failure", &self.failure.get())
            .finish()
    }
}

impl<T: ?Sized> ModelSlot<T> {
    /// Empty slot in [`Readiness::Uninitialized`].
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(Readiness::Uninitialized as u8),
            model: OnceLock::new(),
            failure: OnceLock::new(),
        }
    }

    /// Slot that is ready immediately.
    pub fn ready(model: Arc<T>) -> Self {
        let slot = Self::new();
        let _ = slot.model.set(model);
        slot.state.store(Readiness::Ready as u8, Ordering::Release);
        slot
    }

    pub fn readiness(&self) -> Readiness {
        // Acquire: pairs with the Release in install() so a Ready reader sees the model.
        Readiness::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves `Uninitialized → Loading`. Returns `false` if a load already started.
    pub fn mark_loading(&self) -> bool {
        self.state
            .compare_exchange(
                Readiness::Uninitialized as u8,
                Readiness::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Stores the loaded model and flips the slot to `Ready`.
    pub fn install(&self, model: Arc<T>) -> LifecycleResult<()> {
        if self.readiness() == Readiness::Failed {
            return Err(LifecycleError::AlreadyInstalled);
        }
        self.model
            .set(model)
            .map_err(|_| LifecycleError::AlreadyInstalled)?;
        self.state.store(Readiness::Ready as u8, Ordering::Release);
        Ok(())
    }

    /// Records a load failure. No-op once the slot is `Ready`.
    pub fn fail(&self, reason: impl Into<String>) {
        if self.readiness() == Readiness::Ready {
            return;
        }
        let _ = self.failure.set(reason.into());
        self.state.store(Readiness::Failed as u8, Ordering::Release);
    }

    /// Returns the model, or the current readiness if it is not loaded.
    pub fn get(&self) -> Result<Arc<T>, Readiness> {
        match self.readiness() {
            Readiness::Ready => self.model.get().cloned().ok_or(Readiness::Ready),
            other => Err(other),
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.get().map(String::as_str)
    }
}
