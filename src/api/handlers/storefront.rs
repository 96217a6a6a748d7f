use axum::{extract::State, response::Html};
use crate::domain::models::plant::Plant;
use crate::domain::services::format::format_price;
use crate::error::AppError;
use crate::state::AppState;
use serde::Serialize;
use std::sync::Arc;
use tera::Context;

pub const SHOP_NAME: &str = "Green Corner Nursery";

#[derive(Serialize)]
struct PlantCard {
    id: String,
    name: String,
    description: String,
    category: String,
    image: String,
    stock: i32,
    price_label: String,
    low_stock: bool,
    out_of_stock: bool,
}

impl From<Plant> for PlantCard {
    fn from(plant: Plant) -> Self {
        Self {
            price_label: format_price(plant.price),
            low_stock: plant.is_low_stock(),
            out_of_stock: !plant.in_stock(),
            id: plant.id,
            name: plant.name,
            description: plant.description,
            category: plant.category,
            image: plant.image,
            stock: plant.stock,
        }
    }
}

pub async fn storefront(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let plants: Vec<PlantCard> = state.catalog_service.list_plants().await?
        .into_iter()
        .map(PlantCard::from)
        .collect();

    let mut context = Context::new();
    context.insert("shop_name", SHOP_NAME);
    context.insert("plants", &plants);

    let html = state.templates.render("storefront.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))?;

    Ok(Html(html))
}
