use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    FromRequest, FromRequestParts,
};
use tracing::debug;

use crate::error::AppError;

/// `Json` body whose parse failures render as the usual error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}
