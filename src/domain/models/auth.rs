use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::user::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://plant-shop.local/claims/username")]
    pub username: String,

    #[serde(rename = "https://plant-shop.local/claims/phone")]
    pub phone: String,

    #[serde(rename = "https://plant-shop.local/claims/role")]
    pub role: Role,

    #[serde(rename = "https://plant-shop.local/claims/csrf")]
    pub csrf_token: String,
}

/// The authenticated actor of a request. Carries no credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub phone: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            phone: claims.phone,
            role: claims.role,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub family_id: String,
    pub generation_id: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Tokens issued on login or refresh.
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: Session,
}
