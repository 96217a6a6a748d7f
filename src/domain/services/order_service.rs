use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::with_deadline;
use crate::config::Config;
use crate::domain::models::{
    auth::Session,
    order::{Buyer, NewOrder, Order, OrderStatus},
    stats::{CustomerSummary, Stats},
};
use crate::domain::ports::{OrderRepository, PlantRepository, UserRepository};
use crate::error::AppError;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    plants: Arc<dyn PlantRepository>,
    users: Arc<dyn UserRepository>,
    store_timeout: Duration,
    allow_guest_checkout: bool,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        plants: Arc<dyn PlantRepository>,
        users: Arc<dyn UserRepository>,
        config: &Config,
    ) -> Self {
        Self {
            orders,
            plants,
            users,
            store_timeout: config.store_timeout,
            allow_guest_checkout: config.allow_guest_checkout,
        }
    }

    pub async fn create_order(&self, input: NewOrder, acting: Option<&Session>) -> Result<Order, AppError> {
        if input.quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".into()));
        }

        let buyer = match acting {
            Some(session) => Buyer::from(session),
            None if self.allow_guest_checkout => Buyer::guest(),
            None => return Err(AppError::Unauthorized),
        };

        let plant = with_deadline(self.store_timeout, self.plants.find_by_id(&input.plant_id))
            .await?
            .ok_or(AppError::NotFound("Plant not found".into()))?;

        if input.quantity > plant.stock {
            warn!(plant_id = %plant.id, stock = plant.stock, quantity = input.quantity, "Order rejected: insufficient stock");
            return Err(AppError::InsufficientStock("Not enough plants in stock".into()));
        }

        input.validate_contact()?;

        let order = Order::place(&plant, &buyer, &input, Utc::now())?;
        let created = with_deadline(self.store_timeout, self.orders.create_reserving_stock(&order)).await?;

        info!(
            order_id = %created.id,
            user_id = %created.user_id,
            plant_id = %created.plant_id,
            quantity = created.quantity,
            total = created.total,
            "Order placed"
        );
        Ok(created)
    }

    pub async fn update_order_status(&self, order_id: &str, new_status: OrderStatus) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;

        if order.status == new_status {
            return Ok(order);
        }
        if order.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Order is already {} and can no longer change",
                order.status.as_str()
            )));
        }
        if !order.status.can_transition_to(new_status) {
            return Err(AppError::InvalidState(format!(
                "Cannot change an order from {} to {}",
                order.status.as_str(),
                new_status.as_str()
            )));
        }

        let release_stock = new_status == OrderStatus::Cancelled;
        let updated = with_deadline(
            self.store_timeout,
            self.orders.transition(&order, new_status, release_stock, Utc::now()),
        )
            .await?
            .ok_or_else(|| AppError::InvalidState("Order was modified by another request, reload and retry".into()))?;

        info!(order_id = %updated.id, from = order.status.as_str(), to = updated.status.as_str(), "Order status updated");
        Ok(updated)
    }

    /// Customer self-service cancellation of a pending order within the cancel window.
    pub async fn cancel_order(&self, order_id: &str, acting: &Session) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;

        if order.user_id != acting.id {
            warn!(order_id = %order.id, user_id = %acting.id, "Cancellation by non-owner rejected");
            return Err(AppError::Forbidden("You can only cancel your own orders".into()));
        }
        if order.status != OrderStatus::Pending {
            return Err(AppError::InvalidState("Only pending orders can be cancelled".into()));
        }
        if !order.is_cancel_window_open(Utc::now()) {
            return Err(AppError::Expired("Orders can only be cancelled within 24 hours of placing them".into()));
        }

        let cancelled = with_deadline(
            self.store_timeout,
            self.orders.transition(&order, OrderStatus::Cancelled, true, Utc::now()),
        )
            .await?
            .ok_or_else(|| AppError::InvalidState("Only pending orders can be cancelled".into()))?;

        info!(order_id = %cancelled.id, restored = cancelled.quantity, "Order cancelled by customer");
        Ok(cancelled)
    }

    /// Irreversible. Stock is not given back.
    pub async fn delete_order(&self, order_id: &str, acting: &Session) -> Result<(), AppError> {
        if !acting.is_admin() {
            return Err(AppError::Forbidden("Only administrators can delete orders".into()));
        }

        with_deadline(self.store_timeout, self.orders.delete(order_id)).await?;
        info!(order_id = %order_id, admin_id = %acting.id, "Order deleted");
        Ok(())
    }

    pub async fn get_order(&self, order_id: &str, acting: &Session) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;
        if order.user_id != acting.id && !acting.is_admin() {
            return Err(AppError::Forbidden("You can only view your own orders".into()));
        }
        Ok(order)
    }

    /// All orders, newest first, optionally only those placed on `date` (UTC).
    pub async fn list_orders(&self, date: Option<NaiveDate>) -> Result<Vec<Order>, AppError> {
        let orders = with_deadline(self.store_timeout, self.orders.list()).await?;
        Ok(match date {
            Some(date) => orders.into_iter().filter(|o| o.created_at.date_naive() == date).collect(),
            None => orders,
        })
    }

    pub async fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, AppError> {
        with_deadline(self.store_timeout, self.orders.list_by_user(user_id)).await
    }

    pub async fn get_stats(&self) -> Result<Stats, AppError> {
        let orders = with_deadline(self.store_timeout, self.orders.list()).await?;
        let plants = with_deadline(self.store_timeout, self.plants.list()).await?;
        let users = with_deadline(self.store_timeout, self.users.list()).await?;
        Ok(Stats::compute(&orders, plants.len(), &users))
    }

    pub async fn customer_summaries(&self) -> Result<Vec<CustomerSummary>, AppError> {
        let users = with_deadline(self.store_timeout, self.users.list()).await?;
        let orders = with_deadline(self.store_timeout, self.orders.list()).await?;

        Ok(users
            .into_iter()
            .filter(|u| !u.is_admin())
            .map(|u| CustomerSummary {
                order_count: orders.iter().filter(|o| o.user_id == u.id).count(),
                id: u.id,
                username: u.username,
                phone: u.phone,
                created_at: u.created_at,
            })
            .collect())
    }

    async fn find(&self, order_id: &str) -> Result<Order, AppError> {
        with_deadline(self.store_timeout, self.orders.find_by_id(order_id))
            .await?
            .ok_or(AppError::NotFound("Order not found".into()))
    }
}
