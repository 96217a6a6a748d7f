use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Stock below this level is flagged as running low on the storefront.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

pub const MAX_PRICE: i64 = 1_000_000_000_000;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub image: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl Plant {
    pub fn new(input: NewPlant) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description.unwrap_or_default(),
            price: input.price,
            stock: input.stock,
            image: input.image.unwrap_or_default(),
            category: input
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn apply(&mut self, patch: PlantPatch, at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category.filter(|c| !c.trim().is_empty()) {
            self.category = category;
        }
        self.updated_at = Some(at);
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::MissingField("Plant name is required".into()));
        }
        if self.price <= 0 {
            return Err(AppError::Validation("Price must be greater than 0".into()));
        }
        if self.price > MAX_PRICE {
            return Err(AppError::Validation(format!("Price cannot exceed {}", MAX_PRICE)));
        }
        if self.stock < 0 {
            return Err(AppError::Validation("Stock cannot be negative".into()));
        }
        Ok(())
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }
}
