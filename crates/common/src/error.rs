//! Common error types and handling for Reelflow

use crate::db::RepositoryError;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Reelflow workspace
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the error code reported to callers of the core
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Repository(RepositoryError::NotFound) => "NOT_FOUND",
            Error::Repository(RepositoryError::AlreadyExists) => "CONFLICT",
            Error::Repository(RepositoryError::InvalidData(_)) => "VALIDATION_ERROR",
            Error::Repository(RepositoryError::Unavailable(_)) => "REPOSITORY_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Authorization(_) => "AUTHORIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.error_code(),
            "NOT_FOUND" | "CONFLICT" | "VALIDATION_ERROR" | "AUTHORIZATION_ERROR"
        )
    }
}
