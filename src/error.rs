/// Unified error types for the creator rights registry
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Validation errors (malformed email, missing field, bad date window)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (duplicate invitation, duplicate credit, bad state transition)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error shape handed to presentation layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl RegistryError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::Validation(_) => "InvalidRequest",
            RegistryError::NotFound(_) => "NotFound",
            RegistryError::Conflict(_) => "Conflict",
            RegistryError::Internal(_)
            | RegistryError::Io(_)
            | RegistryError::Serialization(_) => "InternalError",
        }
    }

    /// Whether the caller can fix the request and retry
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Validation(_) | RegistryError::NotFound(_) | RegistryError::Conflict(_)
        )
    }

    /// Convert into the display-ready response shape
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "Internal error".to_string() // Don't leak details
        };

        ErrorResponse {
            error: self.code().to_string(),
            message,
        }
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
