use async_trait::async_trait;
use journey_core::model::ProgressState;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for journey progress.
///
/// This mirrors the domain `ProgressState` so repositories can store the two
/// fields without leaking storage concerns into the domain layer. The zero
/// record is the first-run default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    pub total_steps: u32,
    pub waypoint_index: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_state(state: &ProgressState) -> Self {
        Self {
            total_steps: state.total_steps(),
            // Route indexes are tiny; a state that somehow exceeds u32 range
            // is stored saturated and rejected as out-of-range on read.
            waypoint_index: u32::try_from(state.waypoint_index()).unwrap_or(u32::MAX),
        }
    }

    /// Convert the record back into a domain `ProgressState`.
    ///
    /// No validation happens here; an out-of-range index is resolved to the
    /// first waypoint when a snapshot is taken.
    #[must_use]
    pub fn into_state(self) -> ProgressState {
        ProgressState::from_persisted(self.total_steps, self.waypoint_index as usize)
    }
}

/// Repository contract for journey progress.
///
/// Progress is a single record per store: `save` overwrites whatever was
/// there (last-write-wins, single writer) and `load` yields the zero record
/// until the first save.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress, or the zero record when nothing has been
    /// saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load(&self) -> Result<ProgressRecord, StorageError>;

    /// Durably store both progress fields.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    record: Arc<Mutex<Option<ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load(&self) -> Result<ProgressRecord, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.unwrap_or_default())
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*record);
        Ok(())
    }
}

/// Aggregates the progress repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}
