//! HTTP-level tests for authentication, authorization and request
//! validation.
//!
//! Every request here is rejected before a query runs, so the lazily
//! connected pool is never used.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    admin_token, body_json, customer_token, get, get_auth, post_json, post_json_auth,
    put_json_auth, send, TEST_CRON_SECRET,
};
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// General HTTP behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let response = get(common::build_test_app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["mailer_configured"], false);
    assert_eq!(json["cron_enabled"], true);
    assert!(json.get("maintenance_interval_secs").is_none());
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(common::build_test_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let response = get(common::build_test_app(), "/api/v1/admin/campaigns").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.len(), 36, "x-request-id should be a UUID string");
}

#[tokio::test]
async fn cors_preflight_allows_admin_origin_and_exposes_retry_after() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/admin/carts/1/remind")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(!methods.contains("PATCH"));

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app().oneshot(request).await.unwrap();
    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("retry-after"));
    assert!(exposed.contains("x-request-id"));
}

// ---------------------------------------------------------------------------
// Admin authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_route_without_token_returns_401() {
    let response = get(common::build_test_app(), "/api/v1/admin/campaigns").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn admin_route_with_garbage_token_returns_401() {
    let response = get_auth(
        common::build_test_app(),
        "/api/v1/admin/carts/abandoned",
        "not-a-jwt",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn admin_route_with_customer_token_returns_403() {
    let response = get_auth(
        common::build_test_app(),
        "/api/v1/admin/settings/free_shipping_min_amount",
        &customer_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn token_signed_with_other_secret_returns_401() {
    let mut config = common::test_config();
    config.jwt.secret = "a-completely-different-secret".into();
    let foreign = dukkan_api::auth::jwt::generate_access_token(
        1,
        dukkan_core::roles::ROLE_ADMIN,
        &config.jwt,
    )
    .unwrap();

    let response = get_auth(common::build_test_app(), "/api/v1/admin/campaigns", &foreign).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Cron secret
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cron_without_secret_returns_401() {
    let response = send(
        common::build_test_app(),
        Method::POST,
        "/api/v1/cron/expire-campaigns",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cron_with_wrong_secret_returns_401() {
    let response = send(
        common::build_test_app(),
        Method::POST,
        "/api/v1/cron/abandoned-carts",
        Some("wrong-secret"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid cron secret");
}

#[tokio::test]
async fn cron_is_disabled_without_configured_secret() {
    let mut config = common::test_config();
    config.cron_secret = None;

    let response = send(
        common::build_test_app_with(config),
        Method::POST,
        "/api/v1/cron/expire-campaigns",
        Some(TEST_CRON_SECRET),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Cron endpoints are disabled");
}

#[tokio::test]
async fn admin_token_is_not_a_cron_secret() {
    let response = send(
        common::build_test_app(),
        Method::POST,
        "/api/v1/cron/expire-campaigns",
        Some(&admin_token()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_shipping_quote_returns_400() {
    let response = get(
        common::build_test_app(),
        "/api/v1/shipping/quote?cart_total=-1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "cart_total must not be negative");
}

#[tokio::test]
async fn blank_coupon_code_returns_400() {
    let response = post_json(
        common::build_test_app(),
        "/api/v1/coupons/check",
        json!({ "code": "   ", "cart_total": "250.00" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "code must not be empty");
}

#[tokio::test]
async fn cart_needs_an_owner() {
    let response = post_json(
        common::build_test_app(),
        "/api/v1/carts",
        json!({ "email": "ayse@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_with_malformed_email_returns_400() {
    let response = post_json(
        common::build_test_app(),
        "/api/v1/carts",
        json!({ "session_id": "sess-1", "email": "ayse-at-example" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_quantity_add_returns_400() {
    let response = post_json(
        common::build_test_app(),
        "/api/v1/carts/1/items",
        json!({ "product_id": 3, "quantity": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn campaign_with_inverted_dates_returns_400() {
    let body = json!({
        "title": "Bahar İndirimi",
        "campaign_type": "PERCENTAGE",
        "scope": "ALL",
        "value": "10",
        "start_date": "2026-05-10T00:00:00Z",
        "end_date": "2026-05-01T00:00:00Z"
    });

    let response = post_json_auth(
        common::build_test_app(),
        "/api/v1/admin/campaigns",
        body,
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn cart_scope_discount_without_minimum_returns_400() {
    let body = json!({
        "title": "Sepette 100 TL",
        "campaign_type": "FIXED",
        "scope": "CART",
        "value": "100",
        "start_date": "2026-05-01T00:00:00Z",
        "end_date": "2026-05-10T00:00:00Z"
    });

    let response = post_json_auth(
        common::build_test_app(),
        "/api/v1/admin/campaigns",
        body,
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_free_shipping_minimum_returns_400() {
    let response = put_json_auth(
        common::build_test_app(),
        "/api/v1/admin/settings/free_shipping_min_amount",
        json!({ "value": "bedava" }),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "free_shipping_min_amount must be a positive amount"
    );
}

#[tokio::test]
async fn reminder_without_mailer_returns_502() {
    let response = post_json_auth(
        common::build_test_app(),
        "/api/v1/admin/carts/5/remind",
        json!({ "discount_code": "SEPET10" }),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DELIVERY_FAILED");
    assert_eq!(json["error"], "email delivery is not configured");
}
