//! Error types for the record store.
//!
//! Store and metric operations return [`StoreError`] so callers can tell a
//! missing record apart from a validation problem or a broken database. The
//! command layer wraps these in `anyhow` for display.

use crate::libs::record::{RecordId, RecordKind};
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure outcomes of store, tracker and metric operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or initialised. Fatal at startup.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No record of `kind` with `id` exists.
    #[error("{kind} record {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },

    /// A required field is missing or a value is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored data violates an expected invariant (unknown amount, negative duration).
    #[error("Data anomaly: {0}")]
    DataAnomaly(String),

    /// `start_tracking` was called while a session is already running.
    #[error("Sleep tracking is already running")]
    AlreadyTracking,

    /// `stop_tracking` was called while idle.
    #[error("Sleep tracking is not running")]
    NotTracking,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading or writing the settings file failed.
    #[error("Settings error: {0}")]
    Settings(String),

    /// A blocking store task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

impl StoreError {
    pub fn not_found(kind: RecordKind, id: impl Into<RecordId>) -> Self {
        StoreError::NotFound { kind, id: id.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    /// True for the recoverable "no such record" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Settings(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::TaskJoin(err.to_string())
    }
}
