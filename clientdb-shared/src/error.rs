/// Error types for the data access layer
///
/// [`StoreError`] covers backend failures. [`DataError`] is what the data
/// access API returns: the caller-facing taxonomy (not found, validation,
/// conflict) plus wrapped storage failures.

use crate::models::Collection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for data access operations
pub type DataResult<T> = Result<T, DataError>;

/// Storage backend failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// Data access API error
#[derive(Debug, Error)]
pub enum DataError {
    /// No record with this id in the collection
    #[error("no record in {collection} with id {id}")]
    NotFound { collection: Collection, id: String },

    /// Input failed validation
    #[error("validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// A unique name is already taken
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DataError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        DataError::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Field names involved in a validation error, empty otherwise
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            DataError::Validation(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        DataError::Store(StoreError::Database(err))
    }
}

impl From<validator::ValidationErrors> for DataError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    FieldError::new(
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field)),
                    )
                })
            })
            .collect();
        // field_errors() is a HashMap; keep the output stable
        details.sort_by(|a, b| a.field.cmp(&b.field));
        DataError::Validation(details)
    }
}
