use crate::domain::{models::plant::Plant, ports::PlantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqlitePlantRepo {
    pool: SqlitePool,
}

impl SqlitePlantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlantRepository for SqlitePlantRepo {
    async fn create(&self, plant: &Plant) -> Result<Plant, AppError> {
        sqlx::query_as::<_, Plant>(
            "INSERT INTO plants (id, name, description, price, stock, image, category, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&plant.id).bind(&plant.name).bind(&plant.description).bind(plant.price)
            .bind(plant.stock).bind(&plant.image).bind(&plant.category).bind(plant.created_at)
            .bind(plant.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, AppError> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Plant>, AppError> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants ORDER BY created_at ASC, name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, plant: &Plant) -> Result<Plant, AppError> {
        sqlx::query_as::<_, Plant>(
            "UPDATE plants SET name=?, description=?, price=?, stock=?, image=?, category=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&plant.name).bind(&plant.description).bind(plant.price).bind(plant.stock)
            .bind(&plant.image).bind(&plant.category).bind(plant.updated_at)
            .bind(&plant.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Plant not found".into()))
    }

    async fn adjust_stock(&self, id: &str, delta_consumed: i32, at: DateTime<Utc>) -> Result<Option<Plant>, AppError> {
        sqlx::query_as::<_, Plant>(
            "UPDATE plants SET stock = stock - ?, updated_at = ? WHERE id = ? AND stock - ? >= 0 RETURNING *"
        )
            .bind(delta_consumed).bind(at).bind(id).bind(delta_consumed)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Plant not found".into())); }
        Ok(())
    }
}
