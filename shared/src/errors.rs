//! Error types for the Weight Tracker application

use thiserror::Error;

/// A user intent that was rejected before any request was issued
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntentError {
    #[error("{0}")]
    Validation(String),

    #[error("Profile is not loaded yet")]
    ProfileNotLoaded,
}

impl From<crate::validation::ValidationError> for IntentError {
    fn from(err: crate::validation::ValidationError) -> Self {
        IntentError::Validation(err.user_message())
    }
}
