//! HTTP behaviour that needs no database: service banner, health
//! degradation, request ids, CORS, and authentication rejections.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth, post_json, post_json_auth};
use tower::ServiceExt;

#[tokio::test]
async fn root_returns_service_banner() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "running");
    assert!(json["name"].is_string());
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get(app, "/").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID string");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = common::build_test_app(common::unreachable_pool());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/feedback")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get(app, "/api/v1/users/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = get_auth(app, "/api/v1/feedback", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = common::build_test_app(common::unreachable_pool());
    let request = Request::builder()
        .uri("/api/v1/feedback/dashboard")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutation_without_valid_token_is_401() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = post_json_auth(
        app,
        "/api/v1/feedback/requests",
        serde_json::json!({ "message": "hi" }),
        "expired-or-forged",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_is_400_with_error_envelope() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "new@example.com",
            "full_name": "New Person",
            "password": "long-enough",
            "role": "overlord",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("overlord"));
}

#[tokio::test]
async fn missing_field_is_400() {
    let app = common::build_test_app(common::unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "someone@example.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
