//! Client error types

use thiserror::Error;
use weight_tracker_shared::errors::IntentError;

/// Errors surfaced by the store and the orchestrator
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Weight entry not found")]
    NotFound,

    #[error("Avatar upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Intent(#[from] IntentError),
}

impl ClientError {
    /// Whether the user can fix this by changing the input
    pub fn is_user_error(&self) -> bool {
        matches!(self, ClientError::Intent(_))
            || matches!(self, ClientError::Api { status, .. } if (400..500).contains(status))
    }
}
