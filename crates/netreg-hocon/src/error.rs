//! Error types for HOCON text operations

use thiserror::Error;

/// Result type for HOCON text operations
pub type HoconResult<T> = Result<T, HoconError>;

/// Errors that can occur while scanning or editing registry text
#[derive(Debug, Error)]
pub enum HoconError {
    /// No block with a `name` field bound to the requested value
    #[error("agent '{name}' not found")]
    TargetNotFound { name: String },

    /// The named block was found but the requested field was not
    #[error("field '{field}' not found for agent '{name}'")]
    FieldNotFound { name: String, field: String },

    /// The field's current value is not a triple-quoted string literal.
    /// Editing anything else (a substitution, a plain scalar, a nested
    /// object) cannot be done safely, so the edit is refused outright.
    #[error("field '{field}' of agent '{name}' is not a triple-quoted string; refusing to edit")]
    UnsupportedValueShape { name: String, field: String },

    /// Brace or quote imbalance preventing a well-defined span
    #[error("malformed structure: {0}")]
    Malformed(String),
}
