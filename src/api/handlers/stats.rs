use axum::{extract::State, response::IntoResponse};
use crate::api::dtos::responses::ok;
use crate::api::extractors::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.order_service.get_stats().await?;
    Ok(ok("Dashboard statistics", stats))
}
