//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use serde::Serialize;
use thiserror::Error;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// Form validation failed on one or more fields
    #[error("Validation failed")]
    Invalid(Vec<FieldError>),
    /// Unique key already taken
    #[error("{0}")]
    Conflict(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Stored data that cannot be decoded, or any other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Invalid(vec![FieldError::new(field, message)])
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        let message = e.to_string();

        if let Some(pos) = message.find("UNIQUE constraint failed: ") {
            let column = message[pos + "UNIQUE constraint failed: ".len()..]
                .split([',', ' ', ')'])
                .next()
                .and_then(|qualified| qualified.rsplit('.').next())
                .unwrap_or("value")
                .to_string();
            return DomainError::Conflict(format!("A record with this {} already exists", column));
        }

        if message.contains("FOREIGN KEY constraint failed") {
            return DomainError::invalid("reference", "Referenced record does not exist");
        }

        DomainError::Database(message)
    }
}
