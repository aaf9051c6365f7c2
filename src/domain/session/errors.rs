//! Session-specific error types.

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::StoreError;

/// Errors returned by session operations.
///
/// Generation failures are not errors here; they surface as fallback
/// outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("The dilemma corpus is empty")]
    EmptyCorpus,

    #[error("No dilemma is currently presented")]
    NoActiveDilemma,

    #[error("A dilemma is already being generated")]
    AlreadyGenerating,

    #[error("Session has not been initialized")]
    NotInitialized,

    #[error("Invalid response: {0}")]
    InvalidResponse(#[source] ValidationError),

    #[error("Invalid state: {0}")]
    InvalidTransition(#[source] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::EmptyCorpus => ErrorCode::EmptyCorpus,
            SessionError::NoActiveDilemma => ErrorCode::NoActiveDilemma,
            SessionError::AlreadyGenerating => ErrorCode::AlreadyGenerating,
            SessionError::NotInitialized => ErrorCode::NotInitialized,
            SessionError::InvalidResponse(ValidationError::OutOfRange { .. }) => {
                ErrorCode::OutOfRange
            }
            SessionError::InvalidResponse(_) => ErrorCode::ValidationFailed,
            SessionError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
            SessionError::Storage(_) => ErrorCode::StorageError,
        }
    }
}
