use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::domain::{
    models::{
        auth::{Claims, IssuedTokens, RefreshTokenRecord, Session},
        order::MIN_PHONE_CHARS,
        user::{User, ADMIN_USERNAME},
    },
    ports::{RefreshTokenRepository, UserRepository},
};
use crate::error::AppError;
use crate::config::Config;
use super::with_deadline;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Sha256, Digest};
use tracing::{error, info, warn};

pub const ACCESS_TOKEN_AUDIENCE: &str = "plant-shop-frontend";
pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 6;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn RefreshTokenRepository>,
    issuer: String,
    store_timeout: StdDuration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn RefreshTokenRepository>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self {
            users,
            tokens,
            issuer: config.auth_issuer.clone(),
            store_timeout: config.store_timeout,
            encoding_key,
            decoding_key,
        })
    }

    pub async fn register(&self, phone: &str, username: &str, password: &str) -> Result<User, AppError> {
        let phone = phone.trim();
        let username = username.trim();

        if phone.is_empty() || username.is_empty() || password.is_empty() {
            return Err(AppError::MissingField("Please fill in phone, username and password".into()));
        }
        if phone.chars().count() < MIN_PHONE_CHARS {
            return Err(AppError::InvalidPhone("Invalid phone number".into()));
        }
        if username.chars().count() < MIN_USERNAME_CHARS {
            return Err(AppError::Validation(format!("Username must be at least {} characters", MIN_USERNAME_CHARS)));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_CHARS)));
        }

        if with_deadline(self.store_timeout, self.users.find_by_username(username)).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        if with_deadline(self.store_timeout, self.users.find_by_phone(phone)).await?.is_some() {
            return Err(AppError::Conflict("Phone number is already registered".into()));
        }

        let user = User::new(username.to_string(), phone.to_string(), hash_password(password)?);
        let created = with_deadline(self.store_timeout, self.users.create(&user)).await?;

        info!(user_id = %created.id, "Registered customer {}", created.username);
        Ok(created)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(Session, IssuedTokens), AppError> {
        let user = with_deadline(self.store_timeout, self.users.find_by_username(username.trim()))
            .await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|_| AppError::Internal)?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_err() {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized);
        }

        let tokens = self.issue_token_pair(&user, Uuid::new_v4().to_string(), 1).await?;
        info!(user_id = %user.id, "User logged in");
        Ok((Session::from(&user), tokens))
    }

    /// Rotates a refresh token. The presented token is consumed and cannot be
    /// replayed. A token whose user is gone takes its whole family with it.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<(Session, IssuedTokens), AppError> {
        let token_hash = hash_token(raw_refresh_token);

        let record = with_deadline(self.store_timeout, self.tokens.find_refresh_token(&token_hash))
            .await?
            .ok_or(AppError::Unauthorized)?;

        with_deadline(self.store_timeout, self.tokens.delete_refresh_token(&token_hash)).await?;

        if record.expires_at < Utc::now() {
            return Err(AppError::Unauthorized);
        }

        let Some(user) = with_deadline(self.store_timeout, self.users.find_by_id(&record.user_id)).await? else {
            with_deadline(self.store_timeout, self.tokens.delete_refresh_family(&record.family_id)).await?;
            return Err(AppError::Unauthorized);
        };

        let tokens = self.issue_token_pair(&user, record.family_id, record.generation_id + 1).await?;
        Ok((Session::from(&user), tokens))
    }

    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(raw_refresh_token);
        with_deadline(self.store_timeout, self.tokens.delete_refresh_token(&token_hash)).await
    }

    /// Verifies an access token and returns its claims. No storage lookup.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[ACCESS_TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    /// Creates the single admin account if it does not exist yet.
    pub async fn ensure_admin(&self, password: Option<&str>) -> Result<(), AppError> {
        if with_deadline(self.store_timeout, self.users.find_by_username(ADMIN_USERNAME)).await?.is_some() {
            return Ok(());
        }

        let password = match password {
            Some(p) => p.to_string(),
            None => {
                let generated: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(16)
                    .map(char::from)
                    .collect();
                warn!("ADMIN_PASSWORD not set, generated admin password: {}", generated);
                generated
            }
        };

        let admin = User::admin("0000000000".to_string(), hash_password(&password)?);
        with_deadline(self.store_timeout, self.users.create(&admin)).await?;
        info!(user_id = %admin.id, "Seeded admin account");
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let user = with_deadline(self.store_timeout, self.users.find_by_id(user_id))
            .await?
            .ok_or(AppError::NotFound("User not found".into()))?;

        if user.is_admin() {
            return Err(AppError::Forbidden("The admin account cannot be deleted".into()));
        }

        with_deadline(self.store_timeout, self.users.delete(&user.id)).await?;
        info!(user_id = %user.id, "Deleted customer {}", user.username);
        Ok(())
    }

    async fn issue_token_pair(&self, user: &User, family_id: String, generation_id: i32) -> Result<IssuedTokens, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(ACCESS_TOKEN_MINUTES)).timestamp() as usize;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user.id.clone(),
            aud: ACCESS_TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            username: user.username.clone(),
            phone: user.phone.clone(),
            role: user.role,
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: hash_token(&refresh_token),
            user_id: user.id.clone(),
            family_id,
            generation_id,
            expires_at: now + Duration::days(REFRESH_TOKEN_DAYS),
            created_at: now,
        };

        with_deadline(self.store_timeout, self.tokens.create_refresh_token(&refresh_record)).await?;
        Ok(IssuedTokens { access_token, refresh_token, csrf_token })
    }
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AppError::Internal)
}
