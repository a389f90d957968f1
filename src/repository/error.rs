//! Collaborator Errors

use crate::domain::TreeError;

pub type PersistResult<T> = Result<T, PersistenceError>;

/// Failure talking to the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

impl From<PersistenceError> for TreeError {
    fn from(err: PersistenceError) -> Self {
        TreeError::Network(err.to_string())
    }
}

/// Failure reading or writing the local cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}
