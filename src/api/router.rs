use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, customer, health, order, plant, stats, storefront};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(storefront::storefront))
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))

        // Catalog
        .route("/api/v1/plants", get(plant::list_plants).post(plant::create_plant))
        .route("/api/v1/plants/{id}", get(plant::get_plant).put(plant::update_plant).delete(plant::delete_plant))
        .route("/api/v1/plants/{id}/stock", post(plant::adjust_stock))

        // Customer orders
        .route("/api/v1/orders", post(order::create_order))
        .route("/api/v1/orders/mine", get(order::list_my_orders))
        .route("/api/v1/orders/{id}", get(order::get_order))
        .route("/api/v1/orders/{id}/cancel", post(order::cancel_order))

        // Admin
        .route("/api/v1/admin/orders", get(order::list_all_orders))
        .route("/api/v1/admin/orders/{id}/status", put(order::update_order_status))
        .route("/api/v1/admin/orders/{id}", delete(order::delete_order))
        .route("/api/v1/admin/customers", get(customer::list_customers))
        .route("/api/v1/admin/customers/{id}", delete(customer::delete_customer))
        .route("/api/v1/admin/stats", get(stats::get_stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
