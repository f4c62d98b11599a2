//! Reranking service entrypoint.

use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;

use sidecar::config::{ServiceConfig, ServiceKind};
use sidecar::embedding::{Reranker, build_reranker};
use sidecar::gateway::{RerankerState, create_reranker_router};
use sidecar::lifecycle::{ModelSlot, load_into_slot, serve_until_shutdown};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env(ServiceKind::Reranker)?;
    config.validate()?;
    let addr = config.socket_addr();

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        backend = %config.backend,
        model = %config.model_name,
        "Reranker starting"
    );

    let slot: Arc<ModelSlot<dyn Reranker>> = Arc::new(ModelSlot::new());
    let app = create_reranker_router(RerankerState::new(Arc::clone(&slot), &config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    let load = tokio::spawn(load_into_slot(slot, move || build_reranker(&config)));

    serve_until_shutdown(listener, app, load).await?;

    tracing::info!("Reranker shutdown complete");
    Ok(())
}
