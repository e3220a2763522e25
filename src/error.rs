use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Per-field validation messages, rendered as `{"errors": {field: [messages]}}`.
#[derive(Debug, Default)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ok(()) when no messages were collected, otherwise the 400 error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Invalid(self))
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not enough seats available")]
    CapacityExceeded,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid input")]
    Invalid(ValidationErrors),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// True for unique-constraint violations from either backend.
    /// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db_err) = err {
            let code = db_err.code().unwrap_or_default();
            return code == "2067" || code == "23505";
        }
        false
    }

    /// Transient contention the caller may retry: SQLite busy/locked
    /// (5, 6 and their extended codes) or Postgres serialization/deadlock
    /// failures (40001, 40P01).
    pub fn is_transient_contention(err: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db_err) = err {
            let code = db_err.code().unwrap_or_default();
            return code == "5"
                || code == "6"
                || code == "261"
                || code == "262"
                || code == "517"
                || code == "40001"
                || code == "40P01";
        }
        false
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if AppError::is_unique_violation(e) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "error": "Resource already exists (duplicate entry)" })),
                    )
                        .into_response();
                }
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::CapacityExceeded => {
                (StatusCode::CONFLICT, "Not enough seats available".to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Invalid(fields) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "errors": fields.0 })))
                    .into_response();
            }
            AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
