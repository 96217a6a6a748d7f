use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::UnknownVariant;

pub const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            _ => Err(UnknownVariant { kind: "role", value }),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, phone: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            phone,
            role: Role::Customer,
            created_at: Utc::now(),
        }
    }

    pub fn admin(phone: String, password_hash: String) -> Self {
        Self {
            role: Role::Admin,
            ..Self::new(ADMIN_USERNAME.to_string(), phone, password_hash)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
