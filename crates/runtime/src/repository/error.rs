//! Error types raised by repository implementations.

use thiserror::Error;

use super::traits::RecordKey;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("{0} was modified by a concurrent transaction")]
    Conflict(RecordKey),

    #[error("backend failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
