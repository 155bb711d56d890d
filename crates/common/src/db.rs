//! Shared storage types for Reelflow
//!
//! Storage itself lives outside the core; collaborators report failures through
//! this type so domain code can treat every backend the same way.

use thiserror::Error;

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
