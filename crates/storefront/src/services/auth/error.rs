//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or unknown login id).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login id already registered.
    #[error("this login ID is already in use")]
    DuplicateLoginId,

    /// Nickname already taken by another customer.
    #[error("this nickname is already in use")]
    DuplicateNickname,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Malformed signup or account-change input.
    #[error("{0}")]
    InvalidInput(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
