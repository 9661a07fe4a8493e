//! Error types for accounts and sessions.

use offramp_database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// Payload problems; the message goes back to the client verbatim.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No session")]
    MissingSession,

    #[error("Invalid session")]
    InvalidToken(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication is not configured")]
    NotConfigured,

    #[error("Password hashing failed")]
    PasswordHashingFailed,

    #[error("Token creation failed: {0}")]
    TokenCreationFailed(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type UserResult<T> = Result<T, UserError>;
