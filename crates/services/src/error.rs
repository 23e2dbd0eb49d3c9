//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `JourneyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JourneyServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
