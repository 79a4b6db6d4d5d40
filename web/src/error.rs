//! Error types for web handlers.
//!
//! This module bridges booking errors and HTTP responses, implementing
//! Axum's `IntoResponse` trait.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use slotbook_core::error::BookingError;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses. Server
/// errors are logged with their source; the client only sees the generic
/// message.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<ResourceDetail>, AppError> {
///     let detail = state.catalog.resource_detail(id).await?;
///     Ok(Json(detail))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 400 validation error for rejected input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 400 error for a slot that does not exist or is already taken.
    #[must_use]
    pub fn slot_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "SLOT_UNAVAILABLE".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ValidationFailed(e) => Self::validation(e.to_string()),
            BookingError::ResourceNotFound(_) => Self::not_found("Expert not found"),
            BookingError::BookingNotFound(_) => Self::not_found("Booking not found"),
            BookingError::SlotUnavailable { .. } => {
                Self::slot_unavailable("Time slot is not available")
            }
            BookingError::SlotAlreadyBooked { .. } => {
                Self::conflict("This time slot is no longer available")
            }
            BookingError::DuplicateResource(email) => {
                Self::conflict(format!("An expert with email {email} already exists"))
            }
            BookingError::StorageFailure(source) => {
                Self::internal("An internal error occurred").with_source(source.into())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use slotbook_core::error::ValidationError;
    use slotbook_core::store::StoreError;
    use slotbook_core::types::ResourceId;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default()
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation_failure_is_bad_request() {
        let err = AppError::from(BookingError::ValidationFailed(ValidationError::new(
            "customerEmail",
            "must be a valid email",
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message, "customerEmail: must be a valid email");
    }

    #[test]
    fn test_slot_outcomes_are_distinct() {
        let unavailable = AppError::from(BookingError::SlotUnavailable {
            date: day(),
            start_time: "09:00".to_string(),
        });
        assert_eq!(unavailable.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unavailable.code(), "SLOT_UNAVAILABLE");

        let lost_race = AppError::from(BookingError::SlotAlreadyBooked {
            date: day(),
            start_time: "09:00".to_string(),
        });
        assert_eq!(lost_race.status(), StatusCode::CONFLICT);
        assert_eq!(lost_race.message, "This time slot is no longer available");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(BookingError::ResourceNotFound(ResourceId::new()));
        assert_eq!(err.to_string(), "[NOT_FOUND] Expert not found");
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let err = AppError::from(BookingError::StorageFailure(StoreError::Unavailable(
            "pool timed out".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
        assert!(std::error::Error::source(&err).is_some());
    }
}
