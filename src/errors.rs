use crate::notify::Notification;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use thiserror::Error;

/// Rejected user input. The collection it targeted is never mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("{field} must be a positive number")]
    InvalidNumber { field: &'static str },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("An entry for {0} already exists")]
    DuplicateDate(NaiveDate),

    #[error("No entry at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No {what} with id {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Unknown {what}: {value}")]
    UnknownKind { what: &'static str, value: String },

    #[error("Timeframe must be at least one week")]
    InvalidTimeframe,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IndexOutOfRange { .. } | ValidationError::NotFound { .. } => {
                Self::not_found(err.to_string())
            }
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(invalid) => invalid.into(),
            other => {
                tracing::error!("store failure: {other}");
                Self::internal(other)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(Notification::error(self.message))).into_response()
    }
}
