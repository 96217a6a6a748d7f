use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::{defaults::default_plants, with_deadline};
use crate::domain::models::plant::{NewPlant, Plant, PlantPatch};
use crate::domain::ports::PlantRepository;
use crate::error::AppError;

pub struct CatalogService {
    plants: Arc<dyn PlantRepository>,
    store_timeout: Duration,
}

impl CatalogService {
    pub fn new(plants: Arc<dyn PlantRepository>, store_timeout: Duration) -> Self {
        Self { plants, store_timeout }
    }

    pub async fn list_plants(&self) -> Result<Vec<Plant>, AppError> {
        with_deadline(self.store_timeout, self.plants.list()).await
    }

    pub async fn get_plant(&self, id: &str) -> Result<Plant, AppError> {
        with_deadline(self.store_timeout, self.plants.find_by_id(id))
            .await?
            .ok_or(AppError::NotFound("Plant not found".into()))
    }

    pub async fn add_plant(&self, input: NewPlant) -> Result<Plant, AppError> {
        let plant = Plant::new(input);
        plant.validate()?;

        let created = with_deadline(self.store_timeout, self.plants.create(&plant)).await?;
        info!(plant_id = %created.id, "Added plant {}", created.name);
        Ok(created)
    }

    pub async fn update_plant(&self, id: &str, patch: PlantPatch) -> Result<Plant, AppError> {
        let mut plant = self.get_plant(id).await?;
        plant.apply(patch, Utc::now());
        plant.validate()?;

        let updated = with_deadline(self.store_timeout, self.plants.update(&plant)).await?;
        info!(plant_id = %updated.id, "Updated plant {}", updated.name);
        Ok(updated)
    }

    pub async fn delete_plant(&self, id: &str) -> Result<(), AppError> {
        with_deadline(self.store_timeout, self.plants.delete(id)).await?;
        info!(plant_id = %id, "Deleted plant");
        Ok(())
    }

    /// Positive `delta_consumed` takes stock, negative gives it back.
    pub async fn update_stock(&self, id: &str, delta_consumed: i32) -> Result<Plant, AppError> {
        let plant = self.get_plant(id).await?;
        let Some(remaining) = plant.stock.checked_sub(delta_consumed) else {
            warn!(plant_id = %id, stock = plant.stock, delta_consumed, "Stock update out of range");
            return Err(AppError::Validation("Stock adjustment is out of range".into()));
        };
        if remaining < 0 {
            warn!(plant_id = %id, stock = plant.stock, delta_consumed, "Stock update rejected");
            return Err(AppError::InsufficientStock(format!("Only {} left in stock", plant.stock)));
        }

        // The adapter re-checks the guard, so a concurrent writer cannot push stock below zero.
        with_deadline(self.store_timeout, self.plants.adjust_stock(id, delta_consumed, Utc::now()))
            .await?
            .ok_or_else(|| AppError::InsufficientStock("Not enough plants in stock".into()))
    }

    /// Fills an empty catalog with the nursery's starter plants.
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        if !self.list_plants().await?.is_empty() {
            return Ok(0);
        }

        let mut created = 0;
        for input in default_plants() {
            self.add_plant(input).await?;
            created += 1;
        }
        info!("Seeded {} default plants", created);
        Ok(created)
    }
}
