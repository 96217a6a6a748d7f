use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const SYSTEM_ERROR_MESSAGE: &str = "A system error occurred, please try again later";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Storage call timed out")]
    Timeout,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid phone: {0}")]
    InvalidPhone(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Expired: {0}")]
    Expired(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// Machine readable error kind carried next to the human readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InsufficientStock,
    MissingField,
    InvalidAddress,
    InvalidPhone,
    Unauthorized,
    Forbidden,
    InvalidState,
    Expired,
    Conflict,
    Validation,
    SystemError,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            AppError::Database(_) | AppError::Timeout | AppError::Internal | AppError::InternalWithMsg(_) => {
                ErrorKind::SystemError
            }
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InsufficientStock(_) => ErrorKind::InsufficientStock,
            AppError::MissingField(_) => ErrorKind::MissingField,
            AppError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            AppError::InvalidPhone(_) => ErrorKind::InvalidPhone,
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::InvalidState(_) => ErrorKind::InvalidState,
            AppError::Expired(_) => ErrorKind::Expired,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Message safe to show to the end user. Storage and internal failures
    /// never leak their details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) if is_unique_violation(e) => {
                "Resource already exists (duplicate entry)".to_string()
            }
            AppError::Database(_) | AppError::Timeout | AppError::Internal | AppError::InternalWithMsg(_) => {
                SYSTEM_ERROR_MESSAGE.to_string()
            }
            AppError::Unauthorized => "Please log in to continue".to_string(),
            AppError::NotFound(msg)
            | AppError::InsufficientStock(msg)
            | AppError::MissingField(msg)
            | AppError::InvalidAddress(msg)
            | AppError::InvalidPhone(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidState(msg)
            | AppError::Expired(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InsufficientStock | ErrorKind::InvalidState | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::MissingField
            | ErrorKind::InvalidAddress
            | ErrorKind::InvalidPhone
            | ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Expired => StatusCode::GONE,
            ErrorKind::SystemError => match self {
                AppError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// 2067 = SQLite Unique Constraint
// 23505 = PostgreSQL Unique Violation
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "2067" || code == "23505")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) if !is_unique_violation(e) => error!("Database error: {:?}", e),
            AppError::Timeout => error!("Storage call timed out"),
            AppError::InternalWithMsg(msg) => error!("Internal error: {}", msg),
            AppError::Internal => error!("Internal error"),
            _ => {}
        }

        let body = Json(json!({
            "success": false,
            "message": self.user_message(),
            "kind": self.kind(),
        }));

        (self.status_code(), body).into_response()
    }
}
