//! Error types for the entity model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while binding raw data to a schema.
///
/// Variants are deliberately distinguishable: calling layers map identifier
/// and schema problems to different response categories than persistence
/// failures.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The named schema is not known to the registry.
    #[error("unknown schema: {name}")]
    UnknownSchema { name: String },

    /// The raw payload names no schema at all.
    #[error("entity data does not name a schema")]
    MissingSchema,

    /// A caller-supplied entity id fails format validation.
    #[error("invalid entity id: {0:?}")]
    InvalidId(String),

    /// A property value violates its declared type when strict validation
    /// was requested. Carries enough detail for a precise user-facing
    /// message.
    #[error("schema {schema}: property {property}: {constraint}")]
    Validation {
        schema: String,
        property: String,
        constraint: String,
    },
}
