use aerobook_booking::{BookingError, ErrorKind, SearchError};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body text for 500 responses. The real cause only goes to the log.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    ExternalApiError(String),
    #[error("{0}")]
    UnexpectedError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApiError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnexpectedError(msg) => {
                tracing::error!("Unexpected error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AppError::ValidationError(err.to_string()),
            ErrorKind::ExternalApi => {
                tracing::info!("Booking refused at {} stage: {}", err.stage(), err);
                AppError::ExternalApiError(err.to_string())
            }
            ErrorKind::Unexpected => AppError::UnexpectedError(format!("booking {} stage: {:?}", err.stage(), err)),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AppError::ValidationError(err.to_string()),
            ErrorKind::ExternalApi => AppError::ExternalApiError(err.to_string()),
            ErrorKind::Unexpected => AppError::UnexpectedError(format!("search: {:?}", err)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(format!("Invalid query string: {}", rejection.body_text()))
    }
}
