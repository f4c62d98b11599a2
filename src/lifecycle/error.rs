use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("model load failed: {reason}")]
    LoadFailed { reason: String },

    #[error("model load task aborted: {reason}")]
    LoadAborted { reason: String },

    #[error("model already installed")]
    AlreadyInstalled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
