use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced at the request boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed upload or request parameters. The message is shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    #[error("data access error: {0}")]
    DataAccess(#[from] sqlx::Error),

    /// Nothing to reconcile.
    #[error("{0}")]
    NoOp(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NoOp(_) => StatusCode::BAD_REQUEST,
            AppError::DataAccess(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NoOp(msg) => msg.clone(),
            AppError::DataAccess(_) => "Failed to load purchase invoices".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// Uniform failure body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::DataAccess(e) => tracing::error!("Data access failed: {:?}", e),
            AppError::Internal(e) => tracing::error!("Internal error: {}", e),
            _ => tracing::warn!("Request rejected: {}", self),
        }

        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
