pub mod sqlite_order_repo;
pub mod sqlite_plant_repo;
pub mod sqlite_refresh_token_repo;
pub mod sqlite_user_repo;

pub mod postgres_order_repo;
pub mod postgres_plant_repo;
pub mod postgres_refresh_token_repo;
pub mod postgres_user_repo;
