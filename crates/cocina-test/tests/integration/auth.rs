//! Registration, login, invites and the caller's profile.

use salvo::http::StatusCode;
use serde_json::json;

use cocina_test::db::db::enums::{Language, Role};
use cocina_test::db::store::Store;

use super::helpers::*;

fn token_from_invite_url(url: &str) -> String {
    url.split_once("token=")
        .map(|(_, token)| token.to_string())
        .expect("Invite URL should carry a token")
}

async fn issue_invite(app: &TestApp, admin_token: &str, email: &str) -> String {
    // Invitees join as viewers whatever role the admin asks for.
    let response = TestRequest::post("/api/auth/invite")
        .bearer(admin_token)
        .json(&json!({ "email": email, "role": "admin" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Invitation created");
    assert!(body["expiresAt"].is_string());
    let url = body["inviteUrl"].as_str().expect("inviteUrl").to_string();
    assert!(url.starts_with(&format!("{FRONTEND_URL}/register?token=")));
    token_from_invite_url(&url)
}

#[test_log::test(tokio::test)]
async fn invite_then_register_consumes_token() {
    let app = TestApp::new();
    let (admin, admin_token) = app
        .signed_in("abuela@example.com", Role::Admin, Language::Es)
        .await;
    let invite_token = issue_invite(&app, &admin_token, "prima@example.com").await;

    let response = TestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "Prima@Example.com",
            "password": "tamales123",
            "name": "Prima",
            "inviteToken": invite_token,
            "languagePref": "es",
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "prima@example.com");
    assert_eq!(body["user"]["role"], "viewer");
    assert_eq!(body["user"]["languagePref"], "es");
    assert!(body["user"].get("passwordHash").is_none());

    let stored = app
        .store
        .find_user_by_email("prima@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.invited_by_id, Some(admin.id));

    let token = body["token"].as_str().unwrap();
    TestRequest::get("/api/auth/me")
        .bearer(token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "tio@example.com",
            "password": "tamales123",
            "name": "Tio",
            "inviteToken": invite_token,
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid or expired invite token");
}

#[test_log::test(tokio::test)]
async fn reissued_invite_replaces_earlier_token() {
    let app = TestApp::new();
    let (_, admin_token) = app
        .signed_in("abuela@example.com", Role::Admin, Language::En)
        .await;
    let first = issue_invite(&app, &admin_token, "uno@example.com").await;
    let second = issue_invite(&app, &admin_token, "dos@example.com").await;
    assert_ne!(first, second);

    TestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "uno@example.com",
            "password": "tamales123",
            "name": "Uno",
            "inviteToken": first,
        }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid or expired invite token");
}

#[test_log::test(tokio::test)]
async fn register_reports_every_invalid_field() {
    let app = TestApp::new();
    TestRequest::post("/api/auth/register")
        .json(&json!({ "email": "nope", "password": "short", "languagePref": "fr" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_field_error("body", "email")
        .assert_field_error("body", "password")
        .assert_field_error("body", "name")
        .assert_field_error("body", "inviteToken")
        .assert_field_error("body", "languagePref");
}

#[test_log::test(tokio::test)]
async fn invite_rejects_registered_email() {
    let app = TestApp::new();
    let (_, admin_token) = app
        .signed_in("abuela@example.com", Role::Admin, Language::En)
        .await;
    app.seed_user("tio@example.com", Role::Viewer, Language::En)
        .await;

    TestRequest::post("/api/auth/invite")
        .bearer(&admin_token)
        .json(&json!({ "email": "tio@example.com" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Email already registered or invited");
}

#[test_log::test(tokio::test)]
async fn invite_is_admin_only() {
    let app = TestApp::new();
    let (_, editor_token) = app
        .signed_in("editor@example.com", Role::Editor, Language::En)
        .await;

    TestRequest::post("/api/auth/invite")
        .bearer(&editor_token)
        .json(&json!({ "email": "x@example.com" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Insufficient permissions");

    TestRequest::post("/api/auth/invite")
        .json(&json!({ "email": "x@example.com" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Access token required");
}

#[test_log::test(tokio::test)]
async fn login_failures_look_the_same() {
    let app = TestApp::new();
    let user = app
        .seed_user("primo@example.com", Role::Viewer, Language::En)
        .await;

    let response = TestRequest::post("/api/auth/login")
        .json(&json!({ "email": "PRIMO@example.com", "password": PASSWORD }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], user.id);

    for (email, password) in [
        ("primo@example.com", "wrong password"),
        ("nadie@example.com", PASSWORD),
    ] {
        TestRequest::post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send(&app.service)
            .await
            .assert_status(StatusCode::UNAUTHORIZED)
            .assert_error("Invalid credentials");
    }

    assert!(app.store.set_user_active(user.id, false).await);
    TestRequest::post("/api/auth/login")
        .json(&json!({ "email": "primo@example.com", "password": PASSWORD }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Invalid credentials");
}

#[test_log::test(tokio::test)]
async fn bearer_token_failures() {
    let app = TestApp::new();
    let (user, token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;

    TestRequest::get("/api/auth/me")
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Access token required");

    TestRequest::get("/api/auth/me")
        .bearer("not-a-jwt")
        .send(&app.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Invalid or expired token");

    assert!(app.store.set_user_active(user.id, false).await);
    TestRequest::get("/api/auth/me")
        .bearer(&token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Invalid or inactive user");
}

#[test_log::test(tokio::test)]
async fn profile_update_changes_language() {
    let app = TestApp::new();
    let (_, token) = app
        .signed_in("primo@example.com", Role::Viewer, Language::En)
        .await;

    let body = TestRequest::get("/api/auth/me")
        .bearer(&token)
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["user"]["email"], "primo@example.com");
    assert!(body.get("message").is_none());

    let body = TestRequest::put("/api/auth/me")
        .bearer(&token)
        .json(&json!({ "name": " Primo ", "languagePref": "es" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["name"], "Primo");
    assert_eq!(body["user"]["languagePref"], "es");

    TestRequest::put("/api/auth/me")
        .bearer(&token)
        .json(&json!({ "languagePref": "fr" }))
        .send(&app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_field_error("body", "languagePref");
}
