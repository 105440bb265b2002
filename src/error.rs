//! Error type shared by the repositories, upstream clients and HTTP handlers.
//!
//! Every failure is rendered as `{"success": false, "error": "..."}` with a
//! conventional status code. There is no finer-grained error taxonomy.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    BadRequest(String),

    /// No valid session cookie.
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key. Rendered as 400 like any other bad input.
    #[error("{0}")]
    Conflict(String),

    /// An upstream API answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds a `BadRequest` from validator output.
    ///
    /// Absent or empty required fields collapse into the single
    /// "Missing required fields" message; anything else names the fields.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let missing = field_errors
            .values()
            .flat_map(|errs| errs.iter())
            .any(|e| e.code == "required" || e.code == "length");
        if missing {
            return AppError::BadRequest("Missing required fields".into());
        }

        let mut fields: Vec<&str> = errors.errors().keys().copied().collect();
        fields.sort_unstable();
        AppError::BadRequest(format!("Invalid value for {}", fields.join(", ")))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => *status,
            AppError::Database(_) | AppError::Http(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
