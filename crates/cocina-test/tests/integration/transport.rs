//! Health check, routing fallbacks, body parsing, CORS and security headers.

use salvo::http::StatusCode;

use cocina_test::db::db::enums::{Language, Role};

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn health_needs_no_token() {
    let app = TestApp::new();
    let body = TestRequest::get("/api/health")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[test_log::test(tokio::test)]
async fn unknown_api_path_is_json_404() {
    let app = TestApp::new();
    TestRequest::get("/api/does-not-exist")
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("API endpoint not found");

    TestRequest::get("/api/recipes/1/extra")
        .send(&app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("API endpoint not found");
}

#[test_log::test(tokio::test)]
async fn malformed_json_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("abuela@example.com", Role::Viewer, Language::En)
        .await;

    TestRequest::post("/api/recipes")
        .bearer(&token)
        .content_type("application/json")
        .body("{not json")
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid request body");
}

#[test_log::test(tokio::test)]
async fn cors_echoes_allowed_origin_only() {
    let app = TestApp::new();

    let allowed = TestRequest::get("/api/health")
        .header("Origin", "http://localhost:5173")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        allowed.get_header("access-control-allow-origin"),
        Some("http://localhost:5173")
    );

    let denied = TestRequest::get("/api/health")
        .header("Origin", "https://evil.example.com")
        .send(&app.service)
        .await;
    assert!(denied.get_header("access-control-allow-origin").is_none());
}

#[test_log::test(tokio::test)]
async fn responses_carry_security_headers() {
    let app = TestApp::new();
    for path in ["/api/health", "/api/does-not-exist"] {
        let res = TestRequest::get(path).send(&app.service).await;
        assert_eq!(res.get_header("x-content-type-options"), Some("nosniff"));
        assert_eq!(res.get_header("x-frame-options"), Some("SAMEORIGIN"));
        assert_eq!(res.get_header("referrer-policy"), Some("no-referrer"));
    }
}
