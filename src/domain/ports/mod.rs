use crate::domain::models::{
    auth::RefreshTokenRecord, order::{Order, OrderStatus}, plant::Plant, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PlantRepository: Send + Sync {
    async fn create(&self, plant: &Plant) -> Result<Plant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, AppError>;
    async fn list(&self) -> Result<Vec<Plant>, AppError>;
    async fn update(&self, plant: &Plant) -> Result<Plant, AppError>;
    /// Subtracts `delta_consumed` from the stock unless that would make it
    /// negative. Returns `None` when the guard rejects the change or the
    /// plant does not exist.
    async fn adjust_stock(&self, id: &str, delta_consumed: i32, at: DateTime<Utc>) -> Result<Option<Plant>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Decrements the plant stock and inserts the order in one transaction.
    /// Fails with `InsufficientStock` without writing anything when the
    /// stock no longer covers the quantity.
    async fn create_reserving_stock(&self, order: &Order) -> Result<Order, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError>;
    async fn list(&self) -> Result<Vec<Order>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, AppError>;
    /// Moves the order from its current status to `to`, guarded on the
    /// status still being `order.status`. When `release_stock` is set the
    /// ordered quantity goes back to the plant in the same transaction.
    /// Returns `None` if the order changed in the meantime.
    async fn transition(
        &self,
        order: &Order,
        to: OrderStatus,
        release_stock: bool,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
