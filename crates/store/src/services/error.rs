//! Service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur in service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] commerce_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or missing.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Requested parent would not produce a valid category tree.
    #[error("invalid parent category: {0}")]
    InvalidParent(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Whether the error means the requested record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}
