//! `/api/auth`: registration, login, invites and the caller's profile.

use chrono::{DateTime, Utc};
use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::AUTH_ROUTE_COMPONENT;
use cocina_service::auth::depot::require_user;
use cocina_service::localize::UserView;
use cocina_service::resource::accounts::{
    self, InviteRequest, LoginRequest, ProfileRequest, RegisterRequest,
};

use super::json_body;
use crate::config::get_config_from_depot;
use crate::error::{AppResult, respond};
use crate::middleware::auth::get_session_keys_from_depot;
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub message: &'static str,
    pub expires_at: DateTime<Utc>,
    pub invite_url: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserView,
}

async fn register(req: &mut Request, depot: &Depot) -> AppResult<SessionResponse> {
    let body: RegisterRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let keys = get_session_keys_from_depot(depot)?;

    let session = accounts::register(store.as_ref(), &keys, body, Utc::now()).await?;
    Ok(SessionResponse {
        message: "User registered successfully",
        token: session.token,
        user: session.user,
    })
}

/// ## Summary
/// POST /api/auth/register - Create an account from an invite token
///
/// ## Side Effects
/// Consumes the inviter's token.
///
/// ## Errors
/// 400 for validation failures, a bad invite token or a taken email.
#[handler]
async fn register_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = register(req, depot).await;
    respond(res, depot, StatusCode::CREATED, result);
}

async fn login(req: &mut Request, depot: &Depot) -> AppResult<SessionResponse> {
    let body: LoginRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let keys = get_session_keys_from_depot(depot)?;

    let session = accounts::login(store.as_ref(), &keys, body, Utc::now()).await?;
    Ok(SessionResponse {
        message: "Login successful",
        token: session.token,
        user: session.user,
    })
}

/// ## Summary
/// POST /api/auth/login - Exchange credentials for a session token
///
/// ## Errors
/// 401 "Invalid credentials" for any credential failure.
#[handler]
async fn login_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = login(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn invite(req: &mut Request, depot: &Depot) -> AppResult<InviteResponse> {
    let actor = require_user(depot)?;
    let body: InviteRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let settings = get_config_from_depot(depot)?;

    let issued = accounts::invite(store.as_ref(), &settings.auth, actor, body, Utc::now()).await?;
    Ok(InviteResponse {
        message: "Invitation created",
        expires_at: issued.expires_at,
        invite_url: issued.invite_url,
    })
}

/// ## Summary
/// POST /api/auth/invite - Admin-only; issues a registration link
#[handler]
async fn invite_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = invite(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[handler]
async fn me_handler(depot: &mut Depot, res: &mut Response) {
    let result = require_user(depot)
        .map(|actor| UserResponse {
            message: None,
            user: accounts::me(actor),
        })
        .map_err(Into::into);
    respond(res, depot, StatusCode::OK, result);
}

async fn update_profile(req: &mut Request, depot: &Depot) -> AppResult<UserResponse> {
    let actor = require_user(depot)?;
    let body: ProfileRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;

    let user = accounts::update_profile(store.as_ref(), actor, body).await?;
    Ok(UserResponse {
        message: Some("Profile updated successfully"),
        user,
    })
}

#[handler]
async fn update_profile_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = update_profile(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register_handler))
        .push(Router::with_path("login").post(login_handler))
        .push(Router::with_path("invite").post(invite_handler))
        .push(
            Router::with_path("me")
                .get(me_handler)
                .put(update_profile_handler),
        )
}
