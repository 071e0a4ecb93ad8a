//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::ValidationErrors;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Duplicate {field}: already taken by another account")]
    DuplicateKey { field: &'static str },

    #[error("Post author {author_id} does not reference a live account")]
    InvalidReference { author_id: Uuid },

    /// Deliberately says nothing about which part of the login was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violated on {field}")]
    DuplicateKey { field: &'static str },

    #[error("Referenced account {0} does not exist")]
    InvalidReference(Uuid),
}

impl DomainError {
    /// Translate a storage failure for an operation on `entity_type` `id`.
    pub fn from_repo(err: RepoError, entity_type: &'static str, id: Uuid) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound { entity_type, id },
            other => other.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateKey { field } => Self::DuplicateKey { field },
            RepoError::InvalidReference(author_id) => Self::InvalidReference { author_id },
            RepoError::NotFound => Self::Internal("Entity not found".to_string()),
            RepoError::Connection(msg) | RepoError::Query(msg) => Self::Internal(msg),
        }
    }
}
