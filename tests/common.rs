#![allow(dead_code)]

use plant_shop_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::sqlite_state,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_PASSWORD: &str = "admin-secret";

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        let mut config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
            jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            allow_guest_checkout: false,
            store_timeout: Duration::from_secs(10),
            seed_default_plants: false,
        };
        customize(&mut config);

        let state = Arc::new(sqlite_state(&config, pool.clone()).await.expect("Failed to build test state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, attaching cookie and CSRF header when `auth` is given.
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = json!({
            "username": username,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.starts_with("access_token="))
            .expect("No access_token cookie returned");

        let start = "access_token=".len();
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["data"]["csrfToken"].as_str().expect("No csrfToken in body").to_string();
        let user_id = body_json["data"]["user"]["id"].as_str().expect("No user id in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token,
            user_id,
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login("admin", ADMIN_PASSWORD).await
    }

    pub async fn register_customer(&self, username: &str, phone: &str) -> AuthHeaders {
        let (status, body) = self.send(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "phone": phone, "username": username, "password": "secret123" })),
        ).await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        self.login(username, "secret123").await
    }

    pub async fn create_plant(&self, admin: &AuthHeaders, name: &str, price: i64, stock: i32) -> String {
        let (status, body) = self.send(
            "POST",
            "/api/v1/plants",
            Some(admin),
            Some(json!({ "name": name, "price": price, "stock": stock, "category": "Indoor" })),
        ).await;
        assert_eq!(status, StatusCode::OK, "create plant failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn stock_of(&self, plant_id: &str) -> i64 {
        let (_, body) = self.send("GET", &format!("/api/v1/plants/{}", plant_id), None, None).await;
        body["data"]["stock"].as_i64().unwrap()
    }
}

pub fn order_form(plant_id: &str, quantity: i32) -> Value {
    json!({
        "plantId": plant_id,
        "quantity": quantity,
        "address": "123 Main Street, District 1",
        "phone": "0912345678",
        "note": "Leave at the gate"
    })
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
