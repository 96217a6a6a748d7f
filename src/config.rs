use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub admin_password: Option<String>,
    pub allow_guest_checkout: bool,
    pub store_timeout: Duration,
    pub seed_default_plants: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.plant-shop.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            allow_guest_checkout: env_flag("ALLOW_GUEST_CHECKOUT", false),
            store_timeout: Duration::from_millis(
                env::var("STORE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("STORE_TIMEOUT_MS must be a number of milliseconds"),
            ),
            seed_default_plants: env_flag("SEED_DEFAULT_PLANTS", true),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
