mod common;

use axum::Router;
use axum_test::TestServer;
use deeplink_shortener::routes::app_router;
use serde_json::json;
use std::time::Duration;

/// Full application router. Rate limiting keys on `X-Forwarded-For`, which
/// every request sets, so no socket peer address is needed.
fn server(ctx: &common::TestContext) -> TestServer {
    let app = app_router(ctx.state.clone(), true, Duration::from_secs(5));
    TestServer::new(Router::new().fallback_service(app)).unwrap()
}

#[tokio::test]
async fn test_create_then_redirect() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/v1/urls")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .json(&json!({
            "iosFallbackUrl": "https://apps.apple.com/app/id123",
            "defaultFallbackUrl": "https://example.com/landing",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let short_key = response.json::<serde_json::Value>()["short_key"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get(&format!("/{}", short_key))
        .add_header("X-Forwarded-For", "203.0.113.7")
        .add_header("User-Agent", common::IPHONE_UA)
        .await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://apps.apple.com/app/id123");

    let response = server
        .get(&format!("/v1/urls/{}", short_key))
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["defaultFallbackUrl"],
        "https://example.com/landing"
    );
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let ctx = common::create_test_context();
    ctx.repository
        .seed(123, "ab", common::web_fields("https://example.com"));
    let server = server(&ctx);

    let response = server
        .get("/aB9b/")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    assert_eq!(response.status_code(), 307);
}

#[tokio::test]
async fn test_health_route() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_creation_is_rate_limited() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let mut limited = false;
    for i in 0..50 {
        let response = server
            .post("/v1/urls")
            .add_header("X-Forwarded-For", "198.51.100.1")
            .json(&json!({ "defaultFallbackUrl": format!("https://example.com/{}", i) }))
            .await;

        if response.status_code() == axum::http::StatusCode::TOO_MANY_REQUESTS {
            limited = true;
            break;
        }
    }

    assert!(limited);
}
