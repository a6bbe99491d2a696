pub mod attendance;
pub mod events;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use datepoll_core::DatepollError;
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

use crate::state::AppState;

/// Every API route, mounted under `/api`, plus the health probe.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(events::router(state.clone()))
        .merge(attendance::router(state.clone()));

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationErrors>,
}

/// Error type of every route
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid request body")]
    Validation(ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    /// Carries the underlying failure for the log; clients get a generic message
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }

        let body = match self {
            ApiError::Validation(errors) => ErrorResponse {
                error: "Invalid request body".to_string(),
                details: Some(errors),
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatepollError> for ApiError {
    fn from(err: DatepollError) -> Self {
        match err {
            DatepollError::EventNotFound(_) | DatepollError::AttendeeNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            DatepollError::AttendeeExists(_)
            | DatepollError::DateExists
            | DatepollError::InvalidDate(_) => ApiError::BadRequest(err.to_string()),
            DatepollError::Validation(errors) => ApiError::Validation(errors),
            DatepollError::Config(_) | DatepollError::Io(_) | DatepollError::Serialization(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
