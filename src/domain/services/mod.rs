pub mod auth_service;
pub mod catalog_service;
pub mod defaults;
pub mod format;
pub mod order_service;

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Runs one persistence call under the configured deadline.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| AppError::Timeout)?
}
