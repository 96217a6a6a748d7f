use serde::Serialize;
use chrono::{DateTime, Utc};

use super::{order::{Order, OrderStatus}, user::User};

/// Dashboard figures for the admin panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_orders: usize,
    /// Realized revenue: only completed orders count.
    pub total_revenue: i64,
    pub pending_orders: usize,
    pub completed_orders: usize,
    pub total_products: usize,
    pub total_customers: usize,
}

impl Stats {
    pub fn compute(orders: &[Order], total_products: usize, users: &[User]) -> Self {
        Self {
            total_orders: orders.len(),
            total_revenue: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Completed)
                .map(|o| o.total)
                .sum(),
            pending_orders: orders.iter().filter(|o| o.status == OrderStatus::Pending).count(),
            completed_orders: orders.iter().filter(|o| o.status == OrderStatus::Completed).count(),
            total_products,
            total_customers: users.iter().filter(|u| !u.is_admin()).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub username: String,
    pub phone: String,
    pub order_count: usize,
    pub created_at: DateTime<Utc>,
}
