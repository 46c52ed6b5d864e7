//! # Error Handling Middleware
//!
//! Maps the domain's `SlotError` taxonomy to HTTP status codes and JSON
//! error responses. Business-rule outcomes (conflicts, lost booking races,
//! expired slots) are client errors with specific statuses; only
//! persistence-layer failures surface as 500s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotbook_core::errors::SlotError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `SlotError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub SlotError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            SlotError::NotFound(_) => StatusCode::NOT_FOUND,
            SlotError::Validation(_) => StatusCode::BAD_REQUEST,
            SlotError::Conflict(_) => StatusCode::CONFLICT,
            SlotError::AlreadyBooked(_) => StatusCode::CONFLICT,
            SlotError::SelfConflict(_) => StatusCode::CONFLICT,
            SlotError::Expired(_) => StatusCode::GONE,
            SlotError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SlotError::Forbidden(_) => StatusCode::FORBIDDEN,
            SlotError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SlotError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from SlotError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, SlotError>` in handler functions that return `Result<T, AppError>`.
impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the eyre error in a `SlotError::Database` variant so unexpected
/// persistence failures map to a 500.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SlotError::Database(err))
    }
}
