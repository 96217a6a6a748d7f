use crate::domain::{models::plant::Plant, ports::PlantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresPlantRepo {
    pool: PgPool,
}

impl PostgresPlantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlantRepository for PostgresPlantRepo {
    async fn create(&self, plant: &Plant) -> Result<Plant, AppError> {
        sqlx::query_as::<_, Plant>(
            "INSERT INTO plants (id, name, description, price, stock, image, category, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&plant.id).bind(&plant.name).bind(&plant.description).bind(plant.price)
            .bind(plant.stock).bind(&plant.image).bind(&plant.category).bind(plant.created_at)
            .bind(plant.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, AppError> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Plant>, AppError> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants ORDER BY created_at ASC, name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, plant: &Plant) -> Result<Plant, AppError> {
        sqlx::query_as::<_, Plant>(
            "UPDATE plants SET name=$1, description=$2, price=$3, stock=$4, image=$5, category=$6, updated_at=$7
             WHERE id=$8
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
            "UPDATE plants SET stock = stock - $1, updated_at = $2 WHERE id = $3 AND stock - $1 >= 0 RETURNING *"
        )
            .bind(delta_consumed).bind(at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Plant not found".into())); }
        Ok(())
    }
}
