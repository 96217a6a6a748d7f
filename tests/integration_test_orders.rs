mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{order_form, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_order_lifecycle_with_stock_accounting() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;

    let plant_id = app.create_plant(&admin, "Golden Apricot", 100_000, 5).await;

    let (status, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 3))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 300_000);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["userName"], "alice");
    assert_eq!(body["data"]["plantName"], "Golden Apricot");
    assert_eq!(app.stock_of(&plant_id).await, 2);

    // Second order for more than what is left
    let (status, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 3))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "INSUFFICIENT_STOCK");
    assert_eq!(app.stock_of(&plant_id).await, 2);

    let (status, body) = app.send("GET", "/api/v1/orders/mine", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_price_snapshot_survives_catalog_changes() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Lucky Bamboo", 50_000, 10).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 2))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send(
        "PUT",
        &format!("/api/v1/plants/{}", plant_id),
        Some(&admin),
        Some(json!({ "price": 80_000, "name": "Lucky Bamboo XL" })),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", &format!("/api/v1/orders/{}", order_id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 50_000);
    assert_eq!(body["data"]["total"], 100_000);
    assert_eq!(body["data"]["plantName"], "Lucky Bamboo");
}

#[tokio::test]
async fn test_invalid_delivery_details_do_not_touch_stock() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Orchid", 200_000, 4).await;

    let mut form = order_form(&plant_id, 1);
    form["address"] = json!("short");
    let (status, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_ADDRESS");

    let mut form = order_form(&plant_id, 1);
    form["phone"] = json!("12345");
    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(form)).await;
    assert_eq!(body["kind"], "INVALID_PHONE");

    let mut form = order_form(&plant_id, 1);
    form["address"] = json!("");
    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(form)).await;
    assert_eq!(body["kind"], "MISSING_FIELD");

    let (status, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form("no-such-plant", 1))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");

    assert_eq!(app.stock_of(&plant_id).await, 4);
    let (_, body) = app.send("GET", "/api/v1/orders/mine", Some(&alice), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guest_checkout_requires_opt_in() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let plant_id = app.create_plant(&admin, "Fern", 30_000, 3).await;

    let (status, body) = app.send("POST", "/api/v1/orders", None, Some(order_form(&plant_id, 1))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");

    let open = TestApp::with_config(|c| c.allow_guest_checkout = true).await;
    let admin = open.login_admin().await;
    let plant_id = open.create_plant(&admin, "Fern", 30_000, 3).await;

    let (status, body) = open.send("POST", "/api/v1/orders", None, Some(order_form(&plant_id, 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], "guest");
    assert_eq!(body["data"]["userName"], "Guest");
    assert_eq!(open.stock_of(&plant_id).await, 2);
}

#[tokio::test]
async fn test_double_cancel_restores_stock_once() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Golden Apricot", 100_000, 5).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 3))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.stock_of(&plant_id).await, 2);

    let uri = format!("/api/v1/orders/{}/cancel", order_id);
    let (status, body) = app.send("POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(app.stock_of(&plant_id).await, 5);

    let (status, body) = app.send("POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "INVALID_STATE");
    assert_eq!(app.stock_of(&plant_id).await, 5);
}

#[tokio::test]
async fn test_cancel_by_someone_else_is_forbidden() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let bob = app.register_customer("bob", "0922222222").await;
    let plant_id = app.create_plant(&admin, "Cactus", 20_000, 5).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 1))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.send("POST", &format!("/api/v1/orders/{}/cancel", order_id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");

    let (status, _) = app.send("GET", &format!("/api/v1/orders/{}", order_id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.stock_of(&plant_id).await, 4);
}

#[tokio::test]
async fn test_cancel_after_24_hours_is_expired() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Bonsai", 500_000, 2).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 1))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    sqlx::query("UPDATE orders SET created_at = ? WHERE id = ?")
        .bind(Utc::now() - Duration::hours(25))
        .bind(&order_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.send("POST", &format!("/api/v1/orders/{}/cancel", order_id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["kind"], "EXPIRED");
    assert_eq!(app.stock_of(&plant_id).await, 1);
}

#[tokio::test]
async fn test_admin_status_flow_and_revenue() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Peace Lily", 150_000, 10).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 2))).await;
    let first = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 1))).await;
    let second = body["data"]["id"].as_str().unwrap().to_string();

    let status_uri = |id: &str| format!("/api/v1/admin/orders/{}/status", id);

    // customers cannot drive the admin flow
    let (status, _) = app.send("PUT", &status_uri(&first), Some(&alice), Some(json!({ "status": "processing" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("PUT", &status_uri(&first), Some(&admin), Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "INVALID_STATE");

    for next in ["processing", "completed"] {
        let (status, body) = app.send("PUT", &status_uri(&first), Some(&admin), Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["status"], next);
    }

    let (status, _) = app.send("PUT", &status_uri(&second), Some(&admin), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock_of(&plant_id).await, 8);

    let (status, body) = app.send("GET", "/api/v1/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalOrders"], 2);
    assert_eq!(body["data"]["totalRevenue"], 300_000);
    assert_eq!(body["data"]["pendingOrders"], 0);
    assert_eq!(body["data"]["completedOrders"], 1);
    assert_eq!(body["data"]["totalProducts"], 1);
    assert_eq!(body["data"]["totalCustomers"], 1);

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let (status, body) = app.send("GET", &format!("/api/v1/admin/orders?date={}", today), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app.send("GET", "/api/v1/admin/orders?date=2001-01-01", Some(&admin), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_order_is_admin_only_and_keeps_stock() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Snake Plant", 90_000, 5).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 2))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/admin/orders/{}", order_id);

    let (status, _) = app.send("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock_of(&plant_id).await, 3);

    let (status, body) = app.send("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn test_customer_directory_protects_admin() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Aloe", 40_000, 5).await;
    app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 1))).await;

    let (status, body) = app.send("GET", "/api/v1/admin/customers", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let customers = body["data"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["username"], "alice");
    assert_eq!(customers[0]["orderCount"], 1);
    assert!(customers[0].get("passwordHash").is_none());

    let (status, body) = app.send("DELETE", &format!("/api/v1/admin/customers/{}", admin.user_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");

    let (status, _) = app.send("DELETE", &format!("/api/v1/admin/customers/{}", alice.user_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send("GET", "/api/v1/admin/stats", Some(&admin), None).await;
    assert_eq!(body["data"]["totalCustomers"], 0);
    // orders outlive their customer
    assert_eq!(body["data"]["totalOrders"], 1);
}

#[tokio::test]
async fn test_malformed_requests_get_the_error_envelope() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let alice = app.register_customer("alice", "0911111111").await;
    let plant_id = app.create_plant(&admin, "Snake Plant", 90_000, 4).await;

    let (_, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(order_form(&plant_id, 1))).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.send(
        "PUT",
        &format!("/api/v1/admin/orders/{}/status", order_id),
        Some(&admin),
        Some(json!({ "status": "shipped" })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "VALIDATION");

    let mut form = order_form(&plant_id, 1);
    form.as_object_mut().unwrap().remove("quantity");
    let (status, body) = app.send("POST", "/api/v1/orders", Some(&alice), Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION");

    let (status, body) = app.send("GET", "/api/v1/admin/orders?date=yesterday", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION");

    // nothing above touched the order or the stock
    let (_, body) = app.send("GET", &format!("/api/v1/orders/{}", order_id), Some(&alice), None).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(app.stock_of(&plant_id).await, 3);
}
