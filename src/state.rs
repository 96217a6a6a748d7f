use std::sync::Arc;
use crate::domain::ports::{OrderRepository, PlantRepository, RefreshTokenRepository, UserRepository};
use crate::domain::services::{
    auth_service::AuthService, catalog_service::CatalogService, order_service::OrderService,
};
use crate::config::Config;
use crate::error::AppError;
use tera::Tera;

/// Everything a request handler can reach. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub order_service: Arc<OrderService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Wires the services on top of one set of repositories.
    pub fn assemble(
        config: &Config,
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn RefreshTokenRepository>,
        plant_repo: Arc<dyn PlantRepository>,
        order_repo: Arc<dyn OrderRepository>,
        templates: Arc<Tera>,
    ) -> Result<Self, AppError> {
        let auth_service = Arc::new(AuthService::new(user_repo.clone(), token_repo, config)?);
        let catalog_service = Arc::new(CatalogService::new(plant_repo.clone(), config.store_timeout));
        let order_service = Arc::new(OrderService::new(order_repo, plant_repo, user_repo, config));

        Ok(Self {
            auth_service,
            catalog_service,
            order_service,
            templates,
        })
    }
}
