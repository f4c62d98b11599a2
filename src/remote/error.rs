use thiserror::Error;

/// Failures talking to the remote inference daemon.
///
/// [`RemoteError::Unavailable`] is connectivity-class (connect refused, DNS,
/// timeout). The other variants mean the daemon answered but not usefully.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("inference service at {url} unavailable: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("inference service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response from inference service: {reason}")]
    Malformed { reason: String },

    #[error("failed to build HTTP client: {reason}")]
    Client { reason: String },
}

impl RemoteError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Malformed {
                reason: err.to_string(),
            }
        } else {
            RemoteError::Unavailable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
