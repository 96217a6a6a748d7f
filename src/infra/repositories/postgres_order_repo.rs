use crate::domain::{models::order::{Order, OrderStatus}, ports::OrderRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresOrderRepo {
    pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepo {
    async fn create_reserving_stock(&self, order: &Order) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let reserved = sqlx::query("UPDATE plants SET stock = stock - $1, updated_at = $2 WHERE id = $3 AND stock >= $1")
            .bind(order.quantity).bind(order.created_at).bind(&order.plant_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if reserved.rows_affected() == 0 {
            return Err(AppError::InsufficientStock("Not enough plants in stock".into()));
        }

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, user_name, plant_id, plant_name, plant_image, price, quantity, total, address, phone, note, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *"
        )
            .bind(&order.id).bind(&order.user_id).bind(&order.user_name).bind(&order.plant_id)
            .bind(&order.plant_name).bind(&order.plant_image).bind(order.price).bind(order.quantity)
            .bind(order.total).bind(&order.address).bind(&order.phone).bind(&order.note)
            .bind(order.status.as_str()).bind(order.created_at).bind(order.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn transition(&self, order: &Order, to: OrderStatus, release_stock: bool, at: DateTime<Utc>) -> Result<Option<Order>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Order>("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4 RETURNING *")
            .bind(to.as_str()).bind(at).bind(&order.id).bind(order.status.as_str())
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        let Some(updated) = updated else {
            return Ok(None);
        };

        if release_stock {
            sqlx::query("UPDATE plants SET stock = stock + $1, updated_at = $2 WHERE id = $3")
                .bind(order.quantity).bind(at).bind(&order.plant_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Order not found".into())); }
        Ok(())
    }
}
