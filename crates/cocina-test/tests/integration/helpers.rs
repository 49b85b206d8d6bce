#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building the full service over an in-memory store and a fake media host
//! - Seeding users and issuing their session tokens
//! - Making HTTP requests (JSON and multipart)
//! - Asserting on responses

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde_json::Value;

use cocina_test::app::app::build_service;
use cocina_test::common::config::Settings;
use cocina_test::db::db::enums::{Language, MediaType, Role};
use cocina_test::db::model::user::{NewUser, User};
use cocina_test::db::store::Store;
use cocina_test::db::store::memory::MemoryStore;
use cocina_test::service::auth::password::hash_password;
use cocina_test::service::auth::token::{SessionKeys, issue_session_token};
use cocina_test::service::media::{MediaHost, MediaHostError, MediaUpload, StoredMedia};

pub const PASSWORD: &str = "correct horse battery";
pub const JWT_SECRET: &str = "integration-secret";
pub const FRONTEND_URL: &str = "https://recetas.example.com";
/// Small enough that oversize uploads are cheap to build.
pub const MAX_UPLOAD_BYTES: usize = 1024;

const MULTIPART_BOUNDARY: &str = "cocina-test-boundary";

/// Settings used by every test: in-memory store, no rate limiting.
#[must_use]
pub fn test_settings() -> Settings {
    Settings::from_toml_str(&format!(
        r#"
        [auth]
        jwt_secret = "{JWT_SECRET}"
        frontend_url = "{FRONTEND_URL}"

        [media]
        max_upload_bytes = {MAX_UPLOAD_BYTES}

        [rate_limit]
        enabled = false
        "#
    ))
    .expect("Test settings should parse")
}

/// Media host that keeps nothing and records what it was asked to do.
#[derive(Default)]
pub struct FakeMediaHost {
    pub uploads: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(
        &self,
        upload: MediaUpload,
        folder: &str,
    ) -> Result<StoredMedia, MediaHostError> {
        let mut uploads = self.uploads.lock().expect("Upload log lock");
        uploads.push(upload.file_name.clone());
        let public_id = format!("{folder}/{}", uploads.len());
        let media_type = if upload
            .content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("video/"))
        {
            MediaType::Video
        } else {
            MediaType::Image
        };
        Ok(StoredMedia {
            url: format!("https://media.example.com/{public_id}"),
            public_id,
            media_type,
        })
    }

    async fn destroy(&self, public_id: &str, _media_type: MediaType) -> Result<(), MediaHostError> {
        self.destroyed
            .lock()
            .expect("Destroy log lock")
            .push(public_id.to_string());
        Ok(())
    }
}

/// Gives every request the same client address. `TestClient` leaves it
/// unknown, which the per-IP rate limiter refuses to key on.
pub struct FixedClientAddr(pub std::net::SocketAddr);

#[salvo::async_trait]
impl Handler for FixedClientAddr {
    async fn handle(
        &self,
        req: &mut Request,
        _depot: &mut Depot,
        _res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        *req.remote_addr_mut() = self.0.into();
    }
}

/// A fully wired service plus handles on its collaborators.
pub struct TestApp {
    pub service: Service,
    pub store: Arc<MemoryStore>,
    pub media: Arc<FakeMediaHost>,
    keys: SessionKeys,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(FakeMediaHost::default());
        let keys = SessionKeys::new(&settings.auth.jwt_secret, settings.auth.session_ttl_days);

        let dyn_store: Arc<dyn Store> = store.clone();
        let dyn_media: Arc<dyn MediaHost> = media.clone();
        let service = build_service(settings, dyn_store, dyn_media);

        Self {
            service,
            store,
            media,
            keys,
        }
    }

    /// Sends every request from `addr`.
    #[must_use]
    pub fn from_client(mut self, addr: std::net::SocketAddr) -> Self {
        self.service = self.service.hoop(FixedClientAddr(addr));
        self
    }

    /// Creates an active user whose password is [`PASSWORD`].
    pub async fn seed_user(&self, email: &str, role: Role, language: Language) -> User {
        self.store
            .create_user(NewUser {
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("Hashing should succeed"),
                name: Some(email.split('@').next().unwrap_or_default().to_string()),
                role,
                language_pref: language,
                invited_by_id: None,
            })
            .await
            .expect("Failed to seed user")
    }

    /// Issues a session token for `user` with the service's own keys.
    #[must_use]
    pub fn token_for(&self, user: &User) -> String {
        issue_session_token(&self.keys, user, Utc::now()).expect("Token should be issued")
    }

    /// Seeds a user and returns them with a ready-to-use token.
    pub async fn signed_in(&self, email: &str, role: Role, language: Language) -> (User, String) {
        let user = self.seed_user(email, role, language).await;
        let token = self.token_for(&user);
        (user, token)
    }

    /// Creates a recipe over HTTP and returns its id.
    pub async fn create_recipe(&self, token: &str, body: &Value) -> i64 {
        let response = TestRequest::post("/api/recipes")
            .bearer(token)
            .json(body)
            .send(&self.service)
            .await
            .assert_status(StatusCode::CREATED);
        response.json()["recipe"]["id"]
            .as_i64()
            .expect("Created recipe should have an id")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal valid recipe body.
#[must_use]
pub fn recipe_body(title: &str, is_public: bool) -> Value {
    serde_json::json!({
        "titleEn": title,
        "ingredientsEn": ["1 cup masa"],
        "instructionsEn": "Mix and cook.",
        "isPublic": is_public,
    })
}

/// A file part for [`TestRequest::multipart`].
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Builds a `multipart/form-data` body with text fields and an optional `file` part.
#[must_use]
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Builder for HTTP test requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn options(path: &str) -> Self {
        Self::new(Method::OPTIONS, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {token}"))
    }

    #[must_use]
    pub fn content_type(self, content_type: &str) -> Self {
        self.header("Content-Type", content_type)
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json(self, value: &Value) -> Self {
        self.content_type("application/json")
            .body(serde_json::to_vec(value).expect("JSON body should serialize"))
    }

    /// Sets a multipart request body built by [`multipart_body`].
    #[must_use]
    pub fn multipart(self, fields: &[(&str, &str)], file: Option<&FilePart<'_>>) -> Self {
        self.content_type(&format!(
            "multipart/form-data; boundary={MULTIPART_BOUNDARY}"
        ))
        .body(multipart_body(fields, file))
    }

    /// Sends the request to the test service and returns the response.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5801{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            "PUT" => TestClient::put(&url),
            "DELETE" => TestClient::delete(&url),
            "OPTIONS" => TestClient::options(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[track_caller]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}: {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that the body is `{"error": expected}`.
    #[track_caller]
    pub fn assert_error(self, expected: &str) -> Self {
        assert_eq!(
            self.json()["error"],
            expected,
            "Unexpected error body: {}",
            self.body_string()
        );
        self
    }

    /// Asserts that the body carries a validation error on `param` at `location`.
    #[track_caller]
    pub fn assert_field_error(self, location: &str, param: &str) -> Self {
        let body = self.json();
        let found = body["errors"].as_array().is_some_and(|errors| {
            errors
                .iter()
                .any(|e| e["location"] == location && e["param"] == param)
        });
        assert!(
            found,
            "Expected a {location} error on '{param}' but got: {}",
            self.body_string()
        );
        self
    }

    /// Returns the body as a UTF-8 string.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    #[must_use]
    #[track_caller]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Body is not JSON ({e}): {}", self.body_string()))
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
