use axum::{extract::{State, Path}, response::IntoResponse};
use crate::api::dtos::responses::{done, ok};
use crate::api::extractors::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.order_service.customer_summaries().await?;
    Ok(ok(format!("{} customers", customers.len()), customers))
}

pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.delete_user(&user_id).await?;
    Ok(done("Customer deleted"))
}
