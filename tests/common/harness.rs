//! Test server harness.
//!
//! Spawns a real service (router + background model load) on an ephemeral port,
//! the same way the binaries do, minus signal handling.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sidecar::config::{BackendKind, ServiceConfig, ServiceKind};
use sidecar::embedding::{Embedder, Reranker, build_embedder, build_reranker};
use sidecar::gateway::{EmbedderState, RerankerState, create_embedder_router, create_reranker_router};
use sidecar::lifecycle::{ModelSlot, Readiness, load_into_slot};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 20;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub kind: ServiceKind,
    pub backend: BackendKind,
    pub ollama_url: Option<String>,
    pub model_name: Option<String>,
}

impl TestServerConfig {
    pub fn mock(kind: ServiceKind) -> Self {
        Self {
            kind,
            backend: BackendKind::Mock,
            ollama_url: None,
            model_name: None,
        }
    }

    pub fn remote(kind: ServiceKind, ollama_url: impl Into<String>) -> Self {
        Self {
            kind,
            backend: BackendKind::Remote,
            ollama_url: Some(ollama_url.into()),
            model_name: None,
        }
    }

    fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::defaults(self.kind, self.backend);
        config.port = 0;
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(name) = &self.model_name {
            config.model_name = name.clone();
        }
        config
    }
}

type ReadinessProbe = Box<dyn Fn() -> Readiness + Send + Sync>;

fn readiness_probe<T>(slot: Arc<ModelSlot<T>>) -> ReadinessProbe
where
    T: ?Sized + Send + Sync + 'static,
{
    Box::new(move || slot.readiness())
}

pub struct TestServer {
    pub addr: SocketAddr,
    readiness: ReadinessProbe,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn readiness(&self) -> Readiness {
        (self.readiness)()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

/// Returns a base URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let port = find_available_port()
        .await
        .expect("Should find available port");
    format!("http://127.0.0.1:{}", port)
}

async fn wait_for_model<F>(readiness: F) -> Result<(), ServerStartupError>
where
    F: Fn() -> Readiness,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS);

    loop {
        match readiness() {
            Readiness::Ready => return Ok(()),
            Readiness::Failed => {
                return Err(ServerStartupError::StartupFailed(
                    "model load failed".to_string(),
                ));
            }
            _ if start.elapsed() > timeout => return Err(ServerStartupError::Timeout),
            _ => tokio::time::sleep(Duration::from_millis(STARTUP_POLL_INTERVAL_MS)).await,
        }
    }
}

fn serve(listener: TcpListener, app: axum::Router) -> (JoinHandle<()>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (server_handle, shutdown_tx)
}

/// Spawns a service and waits until its model slot is ready.
pub async fn spawn_service(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let service_config = config.service_config();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let (app, readiness): (axum::Router, ReadinessProbe) =
        match config.kind {
            ServiceKind::Embedder => {
                let slot: Arc<ModelSlot<dyn Embedder>> = Arc::new(ModelSlot::new());
                let app =
                    create_embedder_router(EmbedderState::new(Arc::clone(&slot), &service_config));
                let loader_config = service_config.clone();
                tokio::spawn(load_into_slot(Arc::clone(&slot), move || {
                    build_embedder(&loader_config)
                }));
                (app, readiness_probe(slot))
            }
            ServiceKind::Reranker => {
                let slot: Arc<ModelSlot<dyn Reranker>> = Arc::new(ModelSlot::new());
                let app =
                    create_reranker_router(RerankerState::new(Arc::clone(&slot), &service_config));
                let loader_config = service_config.clone();
                tokio::spawn(load_into_slot(Arc::clone(&slot), move || {
                    build_reranker(&loader_config)
                }));
                (app, readiness_probe(slot))
            }
        };

    let (server_handle, shutdown_tx) = serve(listener, app);
    wait_for_model(&readiness).await?;

    Ok(TestServer {
        addr,
        readiness,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Spawns a service whose model never finishes loading.
pub async fn spawn_loading_embedder() -> Result<TestServer, ServerStartupError> {
    let config = ServiceConfig::defaults(ServiceKind::Embedder, BackendKind::Mock);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let slot: Arc<ModelSlot<dyn Embedder>> = Arc::new(ModelSlot::new());
    slot.mark_loading();
    let app = create_embedder_router(EmbedderState::new(Arc::clone(&slot), &config));
    let (server_handle, shutdown_tx) = serve(listener, app);

    Ok(TestServer {
        addr,
        readiness: readiness_probe(slot),
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_available_port() {
        let port = find_available_port()
            .await
            .expect("Should find available port");
        assert!(port > 0);
    }

    #[test]
    fn test_service_config_overrides() {
        let mut config = TestServerConfig::remote(ServiceKind::Reranker, "http://127.0.0.1:1");
        config.model_name = Some("llama3".to_string());

        let service = config.service_config();

        assert_eq!(service.ollama_url, "http://127.0.0.1:1");
        assert_eq!(service.model_name, "llama3");
        assert_eq!(service.backend, BackendKind::Remote);
    }
}
