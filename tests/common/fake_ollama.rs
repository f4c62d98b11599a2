//! In-process stand-in for an Ollama daemon.
//!
//! Serves `/api/tags`, `/api/embeddings` and `/api/generate` with canned
//! behaviour and records every request body it receives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// How `/api/embeddings` answers.
#[derive(Debug, Clone)]
pub enum EmbedBehavior {
    /// Vector of `dim` components derived from the prompt length.
    Vector { dim: usize },
    /// First call gets `first` components, later calls get `rest`.
    Ragged { first: usize, rest: usize },
    /// Non-success status with a text body.
    Status(u16),
    /// `200` with no `embedding` field.
    MissingField,
}

/// How `/api/generate` answers.
#[derive(Debug, Clone)]
pub enum GenerateBehavior {
    /// Same completion text for every prompt.
    Reply(String),
    /// Non-success status with a text body.
    Status(u16),
    /// `200` with no `response` field.
    MissingField,
}

#[derive(Clone)]
struct FakeState {
    embed: EmbedBehavior,
    generate: GenerateBehavior,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct FakeOllama {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakeOllama {
    pub async fn spawn(embed: EmbedBehavior, generate: GenerateBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            embed,
            generate,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/api/tags", get(tags_handler))
            .route("/api/embeddings", post(embeddings_handler))
            .route("/api/generate", post(generate_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind fake Ollama");
        let addr = listener.local_addr().expect("Should have local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub async fn embedding(dim: usize) -> Self {
        Self::spawn(
            EmbedBehavior::Vector { dim },
            GenerateBehavior::Status(404),
        )
        .await
    }

    pub async fn generating(reply: &str) -> Self {
        Self::spawn(
            EmbedBehavior::Status(404),
            GenerateBehavior::Reply(reply.to_string()),
        )
        .await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received so far, oldest first.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }
}

impl Drop for FakeOllama {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn status_response(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "model not found").into_response()
}

async fn tags_handler() -> Json<Value> {
    Json(json!({"models": [{"name": "fake:latest"}]}))
}

async fn embeddings_handler(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    let seen = {
        let mut requests = state.requests.lock();
        requests.push(body.clone());
        requests.len()
    };
    let prompt_len = body["prompt"].as_str().map_or(0, str::len);

    let dim = match state.embed {
        EmbedBehavior::Vector { dim } => dim,
        EmbedBehavior::Ragged { first, rest } => {
            if seen == 1 {
                first
            } else {
                rest
            }
        }
        EmbedBehavior::Status(code) => return status_response(code),
        EmbedBehavior::MissingField => return Json(json!({"model": "fake"})).into_response(),
    };

    let value = 0.01 * (prompt_len as f32 + 1.0);
    Json(json!({ "embedding": vec![value; dim] })).into_response()
}

async fn generate_handler(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().push(body);

    match &state.generate {
        GenerateBehavior::Reply(text) => {
            Json(json!({"model": "fake", "response": text, "done": true})).into_response()
        }
        GenerateBehavior::Status(code) => status_response(*code),
        GenerateBehavior::MissingField => Json(json!({"model": "fake", "done": true})).into_response(),
    }
}
