//! Engine error taxonomy
//!
//! Every fallible operation in the engine reports one of these variants.
//! No failure is fatal to the process: the HTTP layer maps each variant to
//! a status code and the admin surfaces report it next to the operation
//! that failed.

use thiserror::Error;

/// Errors produced by the content engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Missing or invalid administrative credential
    #[error("authentication required: {0}")]
    Auth(String),

    /// Invalid input: missing required attributes, duplicate slugs, missing
    /// required entry fields
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced resource no longer exists
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// State access failure (poisoned lock or similar)
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound { resource, id: id.into() }
    }

    /// Short machine tag used in JSON error bodies
    pub fn tag(&self) -> &'static str {
        match self {
            EngineError::Auth(_) => "auth_error",
            EngineError::Validation(_) => "validation_error",
            EngineError::NotFound { .. } => "not_found",
            EngineError::Storage(_) => "storage_error",
        }
    }
}

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;
