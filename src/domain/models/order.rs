use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use super::{auth::Session, plant::Plant, UnknownVariant};
use crate::error::AppError;

/// How long after placing an order a customer may still cancel it.
pub const CANCEL_WINDOW_HOURS: i64 = 24;
pub const MIN_ADDRESS_CHARS: usize = 15;
pub const MIN_PHONE_CHARS: usize = 10;

pub const GUEST_USER_ID: &str = "guest";
pub const GUEST_USER_NAME: &str = "Guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// pending -> processing | cancelled
    /// processing -> completed | cancelled
    /// completed, cancelled: terminal
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Completed)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
        )
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownVariant { kind: "order status", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub plant_id: String,
    pub plant_name: String,
    pub plant_image: String,
    pub price: i64,
    pub quantity: i32,
    pub total: i64,
    pub address: String,
    pub phone: String,
    pub note: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Checkout form submitted by the storefront.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub plant_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub note: Option<String>,
}

impl NewOrder {
    /// Delivery details checks, applied after the plant and stock checks.
    pub fn validate_contact(&self) -> Result<(), AppError> {
        let address = self.address.trim();
        let phone = self.phone.trim();

        if address.is_empty() || phone.is_empty() {
            return Err(AppError::MissingField("Please fill in the delivery address and phone number".into()));
        }
        if address.chars().count() < MIN_ADDRESS_CHARS {
            return Err(AppError::InvalidAddress(format!(
                "Address must be at least {} characters (house number, street, district)",
                MIN_ADDRESS_CHARS
            )));
        }
        if phone.chars().count() < MIN_PHONE_CHARS {
            return Err(AppError::InvalidPhone("Invalid phone number".into()));
        }
        Ok(())
    }
}

/// Who an order is attributed to.
#[derive(Debug, Clone)]
pub struct Buyer {
    pub id: String,
    pub name: String,
}

impl Buyer {
    pub fn guest() -> Self {
        Self {
            id: GUEST_USER_ID.to_string(),
            name: GUEST_USER_NAME.to_string(),
        }
    }
}

impl From<&Session> for Buyer {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            name: session.username.clone(),
        }
    }
}

impl Order {
    /// Builds a pending order, freezing the plant's name, image and price.
    pub fn place(plant: &Plant, buyer: &Buyer, input: &NewOrder, at: DateTime<Utc>) -> Result<Self, AppError> {
        let total = plant
            .price
            .checked_mul(i64::from(input.quantity))
            .ok_or_else(|| AppError::Validation("Order total is too large".into()))?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: buyer.id.clone(),
            user_name: buyer.name.clone(),
            plant_id: plant.id.clone(),
            plant_name: plant.name.clone(),
            plant_image: plant.image.clone(),
            price: plant.price,
            quantity: input.quantity,
            total,
            address: input.address.trim().to_string(),
            phone: input.phone.trim().to_string(),
            note: input.note.clone().unwrap_or_default(),
            status: OrderStatus::Pending,
            created_at: at,
            updated_at: None,
        })
    }

    pub fn cancel_deadline(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(CANCEL_WINDOW_HOURS)
    }

    pub fn is_cancel_window_open(&self, now: DateTime<Utc>) -> bool {
        now <= self.cancel_deadline()
    }
}
