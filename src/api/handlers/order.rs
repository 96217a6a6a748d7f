use axum::{extract::{State, Path}, response::IntoResponse};
use crate::api::dtos::{
    requests::{OrderListQuery, UpdateStatusRequest},
    responses::{done, ok},
};
use crate::api::extractors::{
    auth::{AdminUser, AuthUser},
    json::{AppJson, AppQuery},
    maybe_auth::MaybeAuthUser,
};
use crate::domain::models::order::NewOrder;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(session): MaybeAuthUser,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.create_order(payload, session.as_ref()).await?;
    Ok(ok("Order placed successfully", order))
}

pub async fn list_my_orders(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.order_service.list_orders_for_user(&session.id).await?;
    Ok(ok(format!("{} orders", orders.len()), orders))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.get_order(&order_id, &session).await?;
    Ok(ok("Order found", order))
}

pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.cancel_order(&order_id, &session).await?;
    Ok(ok("Order cancelled", order))
}

pub async fn list_all_orders(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.order_service.list_orders(query.date).await?;
    Ok(ok(format!("{} orders", orders.len()), orders))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(order_id): Path<String>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.update_order_status(&order_id, payload.status).await?;
    Ok(ok(format!("Order is now {}", order.status.label()), order))
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.order_service.delete_order(&order_id, &admin).await?;
    Ok(done("Order deleted"))
}
