//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use offramp_database::DatabaseError;
use offramp_integrations::IntegrationError;
use offramp_transition::TransitionError;
use offramp_users::UserError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// JSON body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    /// A collaborator failed; the status is chosen by the integration.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<DatabaseError> for GatewayError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => GatewayError::NotFound(message),
            DatabaseError::Duplicate(message) => GatewayError::Conflict(message),
            other => GatewayError::Internal(other.to_string()),
        }
    }
}

impl From<UserError> for GatewayError {
    fn from(error: UserError) -> Self {
        let message = error.to_string();
        match error {
            UserError::ValidationFailed(_) => GatewayError::BadRequest(message),
            UserError::EmailAlreadyExists => GatewayError::Conflict(message),
            UserError::InvalidCredentials
            | UserError::MissingSession
            | UserError::InvalidToken(_)
            | UserError::UserNotFound => GatewayError::Unauthorized(message),
            UserError::Database(inner) => inner.into(),
            UserError::NotConfigured
            | UserError::PasswordHashingFailed
            | UserError::TokenCreationFailed(_) => GatewayError::Internal(message),
        }
    }
}

impl From<TransitionError> for GatewayError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::InvalidInput(message) => GatewayError::BadRequest(message),
            TransitionError::NotFound(message) => GatewayError::NotFound(message),
            TransitionError::Database(inner) => inner.into(),
        }
    }
}

impl From<IntegrationError> for GatewayError {
    fn from(error: IntegrationError) -> Self {
        let status =
            StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = error.to_string();
        match status {
            StatusCode::BAD_REQUEST => GatewayError::BadRequest(message),
            StatusCode::INTERNAL_SERVER_ERROR => GatewayError::Internal(message),
            status => GatewayError::Upstream { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_statuses() {
        let cases = [
            (UserError::ValidationFailed("bad".into()), StatusCode::BAD_REQUEST),
            (UserError::EmailAlreadyExists, StatusCode::CONFLICT),
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::MissingSession, StatusCode::UNAUTHORIZED),
            (UserError::NotConfigured, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(GatewayError::from(error).status_code(), status);
        }
    }

    #[test]
    fn integration_status_is_preserved() {
        let error = GatewayError::from(IntegrationError::Upstream {
            status: 422,
            message: "VeganSwap engine returned an error".into(),
        });
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.to_string(), "VeganSwap engine returned an error");
    }

    #[test]
    fn transition_not_found_is_404() {
        let error = GatewayError::from(TransitionError::NotFound("No preferences".into()));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }
}
