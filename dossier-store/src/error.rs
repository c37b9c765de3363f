//! Error types for the storage layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Model errors (bad ids, unknown schemata, validation) pass through as
/// their own variant so callers can map them to different response
/// categories than persistence failures. The store performs no retries;
/// rollback is the transaction boundary's job.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization of the entity property map failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Schema-binding failure from the model layer.
    #[error(transparent)]
    Model(#[from] dossier_model::ModelError),

    /// A stored timestamp column failed to parse.
    #[error("invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}
