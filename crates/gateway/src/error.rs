//! Error types for the gateway layer

use accountdesk_accounts::{AccountError, ErrorKind};
use accountdesk_auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Session error: {0}")]
    Session(#[from] AuthError),

    #[error("{0}")]
    Account(#[from] AccountError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Session(AuthError::Database(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Session(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Account(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Auth => StatusCode::UNAUTHORIZED,
                ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            GatewayError::from(AccountError::InvalidFrequency).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(AccountError::EmailTaken).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GatewayError::from(AuthError::SessionExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
