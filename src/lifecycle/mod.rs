//! Model readiness, background loading and process shutdown.
//!
//! The listener binds before the model is loaded. Until the load finishes,
//! [`ModelSlot::get`] reports the current [`Readiness`] and the HTTP layer
//! answers `503`. A failed load stops the server.

pub mod error;
pub mod loader;
pub mod readiness;
pub mod shutdown;


pub use error::{LifecycleError, LifecycleResult};
pub use loader::load_into_slot;
pub use readiness::{ModelSlot, Readiness};
pub use shutdown::{serve_until_shutdown, shutdown_signal};
