//! Environment-backed configuration.
//!
//! Both binaries read the same shape of settings; [`ServiceKind`] decides which
//! variable names and defaults apply. Every setting has a default, so a bare
//! `embedder` or `reranker` invocation starts the library-backed service.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_OLLAMA_URL, MOCK_EMBEDDER_MODEL, MOCK_RERANKER_MODEL};

/// Which of the two services a config is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Embedder,
    Reranker,
}

impl ServiceKind {
    /// Default listen port (`8000` embedder, `8001` reranker).
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Embedder => 8000,
            ServiceKind::Reranker => 8001,
        }
    }

    fn backend_var(self) -> &'static str {
        match self {
            ServiceKind::Embedder => "EMBED_BACKEND",
            ServiceKind::Reranker => "RERANKER_BACKEND",
        }
    }

    fn model_name_var(self) -> &'static str {
        match self {
            ServiceKind::Embedder => "EMBED_MODEL_NAME",
            ServiceKind::Reranker => "RERANKER_MODEL_NAME",
        }
    }

    fn model_path_var(self) -> &'static str {
        match self {
            ServiceKind::Embedder => "EMBED_MODEL_PATH",
            ServiceKind::Reranker => "RERANKER_MODEL_PATH",
        }
    }

    /// Model identifier used when none is configured.
    pub fn default_model_name(self, backend: BackendKind) -> &'static str {
        match (self, backend) {
            (ServiceKind::Embedder, BackendKind::Library) => "intfloat/multilingual-e5-large",
            (ServiceKind::Embedder, BackendKind::Remote) => "nomic-embed-text:latest",
            (ServiceKind::Embedder, BackendKind::Mock) => MOCK_EMBEDDER_MODEL,
            (ServiceKind::Reranker, BackendKind::Library) => "BAAI/bge-reranker-v2-m3",
            (ServiceKind::Reranker, BackendKind::Remote) => "qwen2:7b-instruct",
            (ServiceKind::Reranker, BackendKind::Mock) => MOCK_RERANKER_MODEL,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Embedder => f.write_str("embedder"),
            ServiceKind::Reranker => f.write_str("reranker"),
        }
    }
}

/// Backing computation selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process candle model.
    Library,
    /// Remote Ollama-compatible inference daemon.
    Remote,
    /// Synthetic outputs for testing.
    Mock,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Library => "library",
            BackendKind::Remote => "remote",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "library" | "local" | "candle" => Ok(BackendKind::Library),
            "remote" | "ollama" => Ok(BackendKind::Remote),
            "mock" | "simple" | "working" => Ok(BackendKind::Mock),
            _ => Err(ConfigError::UnknownBackend {
                value: s.to_string(),
            }),
        }
    }
}

/// Service configuration loaded from environment variables.
///
/// Use [`ServiceConfig::from_env`] to read overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Which service this config drives.
    pub kind: ServiceKind,

    /// HTTP server port. Default: `8000` / `8001`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Selected backend. Default: [`BackendKind::Library`].
    pub backend: BackendKind,

    /// Model identifier (Hub name for library backends, tag for remote ones).
    pub model_name: String,

    /// Local model directory for library backends.
    pub model_path: Option<PathBuf>,

    /// Base URL of the remote inference daemon.
    pub ollama_url: String,
}

impl ServiceConfig {
    const ENV_HOST: &'static str = "HOST";
    const ENV_PORT: &'static str = "PORT";
    const ENV_OLLAMA_URL: &'static str = "OLLAMA_URL";

    /// Default configuration for a service and backend.
    pub fn defaults(kind: ServiceKind, backend: BackendKind) -> Self {
        Self {
            kind,
            port: kind.default_port(),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            backend,
            model_name: kind.default_model_name(backend).to_string(),
            model_path: None,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
        }
    }

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        let backend = match Self::parse_optional_string_from_env(kind.backend_var()) {
            Some(value) => value.parse()?,
            None => BackendKind::Library,
        };
        let defaults = Self::defaults(kind, backend);

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;

        // Mock backends report fixed identifiers regardless of configuration.
        let model_name = match backend {
            BackendKind::Mock => defaults.model_name,
            _ => Self::parse_optional_string_from_env(kind.model_name_var())
                .unwrap_or(defaults.model_name),
        };
        let model_path =
            Self::parse_optional_string_from_env(kind.model_path_var()).map(PathBuf::from);
        let ollama_url = Self::parse_optional_string_from_env(Self::ENV_OLLAMA_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.ollama_url);

        Ok(Self {
            kind,
            port,
            bind_addr,
            backend,
            model_name,
            model_path,
            ollama_url,
        })
    }

    /// Validates paths and basic invariants (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }

        if let Some(ref path) = self.model_path
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: path.clone() });
        }

        if self.backend == BackendKind::Remote
            && !(self.ollama_url.starts_with("http://") || self.ollama_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidUrl {
                value: self.ollama_url.clone(),
            });
        }

        Ok(())
    }

    /// Directory holding model files: the explicit path, else the model name.
    pub fn model_dir(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.model_name))
    }

    /// Returns the address to bind the listener to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.trim().parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_HOST) {
            Ok(value) if value.trim() == "localhost" => Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
