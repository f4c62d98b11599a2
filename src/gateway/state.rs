use std::sync::Arc;

use crate::config::{BackendKind, ServiceConfig};
use crate::embedding::{Embedder, Reranker};
use crate::lifecycle::ModelSlot;

use super::error::GatewayError;

/// Shared handler state: the model slot plus what `/health` reports before
/// the model exists.
pub struct ServiceState<T: ?Sized> {
    pub slot: Arc<ModelSlot<T>>,

    pub backend: BackendKind,

    pub model_name: String,
}

impl<T: ?Sized> Clone for ServiceState<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            backend: self.backend,
            model_name: self.model_name.clone(),
        }
    }
}

impl<T: ?Sized> ServiceState<T> {
    pub fn new(slot: Arc<ModelSlot<T>>, config: &ServiceConfig) -> Self {
        Self {
            slot,
            backend: config.backend,
            model_name: config.model_name.clone(),
        }
    }

    /// Returns the loaded model or a `503` error.
    pub fn model(&self) -> Result<Arc<T>, GatewayError> {
        self.slot.get().map_err(GatewayError::NotReady)
    }
}

pub type EmbedderState = ServiceState<dyn Embedder>;

pub type RerankerState = ServiceState<dyn Reranker>;
