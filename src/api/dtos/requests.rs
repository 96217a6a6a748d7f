use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::order::OrderStatus;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct StockAdjustmentRequest {
    /// Units taken out of stock. Negative values put stock back.
    pub consumed: i32,
}

#[derive(Deserialize)]
pub struct OrderListQuery {
    pub date: Option<NaiveDate>,
}
