pub mod auth;
pub mod customer;
pub mod health;
pub mod order;
pub mod plant;
pub mod stats;
pub mod storefront;
