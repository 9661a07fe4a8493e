use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotConfigured(String),
    /// An upstream call failed; `status` is what the caller should answer with.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl IntegrationError {
    pub(crate) fn upstream(status: u16, message: impl Into<String>) -> Self {
        IntegrationError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// HTTP status to report to our own clients.
    pub fn status(&self) -> u16 {
        match self {
            IntegrationError::InvalidInput(_) => 400,
            IntegrationError::NotConfigured(_) | IntegrationError::Client(_) => 500,
            IntegrationError::Upstream { status, .. } => *status,
        }
    }
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
