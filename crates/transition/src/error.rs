use offramp_database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransitionError {
    /// Request payload failed validation; the message is shown to the client.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type TransitionResult<T> = Result<T, TransitionError>;
