use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_order_repo::PostgresOrderRepo, postgres_plant_repo::PostgresPlantRepo,
    postgres_refresh_token_repo::PostgresRefreshTokenRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_order_repo::SqliteOrderRepo, sqlite_plant_repo::SqlitePlantRepo,
    sqlite_refresh_token_repo::SqliteRefreshTokenRepo, sqlite_user_repo::SqliteUserRepo,
};

/// Connects to the database named by `DATABASE_URL`, migrates it and seeds
/// the admin account and the starter catalog.
pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse()?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(config.store_timeout)
            .connect_with(opts)
            .await?;

        postgres_state(config, pool).await
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(config.store_timeout)
            .connect_with(opts)
            .await?;

        sqlite_state(config, pool).await
    }
}

pub async fn sqlite_state(config: &Config, pool: SqlitePool) -> Result<AppState, AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))?;

    let state = AppState::assemble(
        config,
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteRefreshTokenRepo::new(pool.clone())),
        Arc::new(SqlitePlantRepo::new(pool.clone())),
        Arc::new(SqliteOrderRepo::new(pool)),
        load_templates()?,
    )?;

    seed(&state, config).await?;
    Ok(state)
}

pub async fn postgres_state(config: &Config, pool: PgPool) -> Result<AppState, AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))?;

    let state = AppState::assemble(
        config,
        Arc::new(PostgresUserRepo::new(pool.clone())),
        Arc::new(PostgresRefreshTokenRepo::new(pool.clone())),
        Arc::new(PostgresPlantRepo::new(pool.clone())),
        Arc::new(PostgresOrderRepo::new(pool)),
        load_templates()?,
    )?;

    seed(&state, config).await?;
    Ok(state)
}

pub fn load_templates() -> Result<Arc<Tera>, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template("storefront.html", include_str!("../../templates/storefront.html"))
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to load storefront template: {}", e)))?;
    Ok(Arc::new(tera))
}

async fn seed(state: &AppState, config: &Config) -> Result<(), AppError> {
    state.auth_service.ensure_admin(config.admin_password.as_deref()).await?;

    if config.seed_default_plants {
        state.catalog_service.seed_defaults().await?;
    }
    Ok(())
}
