use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use loginguard_core::GuardError;
use serde::Serialize;

/// Message returned for every rejected login, whatever the reason.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug)]
pub enum AppError {
    Auth(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Internal(msg) => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", e);
        AppError::Internal("Internal server error".to_string())
    }
}

impl From<GuardError> for AppError {
    fn from(e: GuardError) -> Self {
        match e {
            // Indistinguishable from a wrong password.
            GuardError::RateLimited { .. } => AppError::Auth(INVALID_CREDENTIALS.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}
