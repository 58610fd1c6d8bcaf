//! Application error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Application level errors
///
/// Validation and duplicate-name failures are expected outcomes of user input
/// and are turned into form feedback by the page handlers. Everything else is
/// treated as unexpected and surfaces as a 5xx.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("An item with this name already exists")]
    DuplicateName(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateName(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Template(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::DuplicateName(_) => "duplicate_name",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Database(_) => "database_error",
            AppError::Session(_) => "session_error",
            AppError::Template(_) => "template_error",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the error is recoverable into user-facing form feedback
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::DuplicateName(_))
    }

    pub fn item_not_found() -> Self {
        AppError::NotFound("Item".to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(format!("Migration failed: {}", err))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::Template(err.to_string())
    }
}

macro_rules! document_store_errors {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for AppError {
                fn from(err: $err) -> Self {
                    AppError::Database(format!("Document store error: {}", err))
                }
            }
        )*
    };
}

document_store_errors!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Database(format!("I/O error: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        }

        let body = json!({
            "success": false,
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}
