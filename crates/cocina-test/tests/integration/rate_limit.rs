//! Per-IP request limiting on everything under `/api` except health.

use std::net::{Ipv4Addr, SocketAddr};

use salvo::http::StatusCode;

use cocina_test::common::config::Settings;

use super::helpers::*;

fn limited_app(max_requests: usize) -> TestApp {
    let settings = Settings::from_toml_str(&format!(
        r#"
        [auth]
        jwt_secret = "{JWT_SECRET}"

        [rate_limit]
        enabled = true
        max_requests = {max_requests}
        window_minutes = 1
        "#
    ))
    .unwrap();
    TestApp::with_settings(settings)
        .from_client(SocketAddr::from((Ipv4Addr::new(203, 0, 113, 7), 40000)))
}

#[test_log::test(tokio::test)]
async fn third_request_in_window_is_refused() {
    let app = limited_app(2);

    for _ in 0..2 {
        TestRequest::get("/api/recipes")
            .send(&app.service)
            .await
            .assert_status(StatusCode::OK);
    }

    TestRequest::get("/api/recipes")
        .send(&app.service)
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS)
        .assert_error("Too many requests from this IP, please try again later.");
}

#[test_log::test(tokio::test)]
async fn health_is_not_counted() {
    let app = limited_app(1);

    for _ in 0..3 {
        TestRequest::get("/api/health")
            .send(&app.service)
            .await
            .assert_status(StatusCode::OK);
    }

    TestRequest::get("/api/recipes")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    TestRequest::get("/api/recipes")
        .send(&app.service)
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    TestRequest::get("/api/health")
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
}
