use axum::{extract::{State, Path}, response::IntoResponse};
use crate::api::dtos::{requests::StockAdjustmentRequest, responses::{done, ok}};
use crate::api::extractors::{auth::AdminUser, json::AppJson};
use crate::domain::models::plant::{NewPlant, PlantPatch};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn list_plants(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let plants = state.catalog_service.list_plants().await?;
    Ok(ok(format!("{} plants", plants.len()), plants))
}

pub async fn get_plant(
    State(state): State<Arc<AppState>>,
    Path(plant_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let plant = state.catalog_service.get_plant(&plant_id).await?;
    Ok(ok("Plant found", plant))
}

pub async fn create_plant(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppJson(payload): AppJson<NewPlant>,
) -> Result<impl IntoResponse, AppError> {
    let plant = state.catalog_service.add_plant(payload).await?;
    Ok(ok("Plant added", plant))
}

pub async fn update_plant(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(plant_id): Path<String>,
    AppJson(payload): AppJson<PlantPatch>,
) -> Result<impl IntoResponse, AppError> {
    let plant = state.catalog_service.update_plant(&plant_id, payload).await?;
    Ok(ok("Plant updated", plant))
}

pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(plant_id): Path<String>,
    AppJson(payload): AppJson<StockAdjustmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plant = state.catalog_service.update_stock(&plant_id, payload.consumed).await?;
    Ok(ok(format!("Stock is now {}", plant.stock), plant))
}

pub async fn delete_plant(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(plant_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.catalog_service.delete_plant(&plant_id).await?;
    Ok(done("Plant deleted"))
}
