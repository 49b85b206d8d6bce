//! Registration, login, invites and the caller's own profile.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cocina_core::config::AuthConfig;
use cocina_core::constants::MIN_PASSWORD_LENGTH;
use cocina_core::util::email::{is_valid_email, normalize_email};
use cocina_db::db::enums::{Language, Role};
use cocina_db::model::user::{NewUser, User, UserProfileChanges};
use cocina_db::store::Store;

use crate::auth::invite::generate_invite_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{SessionKeys, issue_session_token};
use crate::error::{ServiceError, ServiceResult};
use crate::localize::{UserView, project_user};
use crate::validate::Validator;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub invite_token: Option<String>,
    pub language_pref: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Invitees always join as viewers; a `role` in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct InviteRequest {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub language_pref: Option<String>,
}

/// A session token with the user it was issued for.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteIssued {
    pub expires_at: DateTime<Utc>,
    pub invite_url: String,
}

fn check_email(validator: &mut Validator, email: Option<&str>) -> String {
    let email = email.map(normalize_email).unwrap_or_default();
    if !is_valid_email(&email) {
        validator.body("email", "Please provide a valid email");
    }
    email
}

/// ## Summary
/// Registers a new viewer using an inviter's live invite token.
///
/// ## Side Effects
/// - Creates a user row (role viewer, `invited_by_id` = inviter)
/// - Clears the inviter's invite token and expiry in the same transaction
///
/// ## Errors
/// - 400 validation errors for malformed fields
/// - 400 "Invalid or expired invite token" when no inviter holds a live token
/// - 400 "Email already registered" when the email is taken
#[tracing::instrument(skip_all)]
pub async fn register(
    store: &dyn Store,
    keys: &SessionKeys,
    request: RegisterRequest,
    now: DateTime<Utc>,
) -> ServiceResult<Session> {
    let mut validator = Validator::new();
    let email = check_email(&mut validator, request.email.as_deref());
    let password = request.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        validator.body("password", "Password must be at least 8 characters long");
    }
    let name = request.name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        validator.body("name", "Name is required");
    }
    let invite_token = request.invite_token.unwrap_or_default();
    if invite_token.trim().is_empty() {
        validator.body("inviteToken", "Invite token is required");
    }
    let language_pref = match request.language_pref.as_deref() {
        None => Language::En,
        Some(code) => Language::parse(code).unwrap_or_else(|| {
            validator.body("languagePref", "Language must be either en or es");
            Language::En
        }),
    };
    validator.finish()?;

    let inviter = store
        .find_inviter_by_token(&invite_token, now)
        .await?
        .ok_or_else(|| ServiceError::BadRequest("Invalid or expired invite token".to_string()))?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::Conflict("Email already registered"));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&password)?,
        name: Some(name),
        role: Role::Viewer,
        language_pref,
        invited_by_id: Some(inviter.id),
    };

    let user = match store
        .register_invited_user(inviter.id, &invite_token, now, new_user)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(ServiceError::BadRequest(
                "Invalid or expired invite token".to_string(),
            ));
        }
        Err(err) if err.is_unique_violation() => {
            return Err(ServiceError::Conflict("Email already registered"));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = user.id, inviter_id = inviter.id, "User registered");

    Ok(Session {
        token: issue_session_token(keys, &user, now)?,
        user: project_user(&user),
    })
}

/// ## Summary
/// Exchanges email and password for a session token.
///
/// ## Errors
/// Returns 401 "Invalid credentials" for an unknown email, a wrong password or
/// an inactive account alike.
#[tracing::instrument(skip_all)]
pub async fn login(
    store: &dyn Store,
    keys: &SessionKeys,
    request: LoginRequest,
    now: DateTime<Utc>,
) -> ServiceResult<Session> {
    let mut validator = Validator::new();
    let email = check_email(&mut validator, request.email.as_deref());
    let password = request.password.unwrap_or_default();
    if password.is_empty() {
        validator.body("password", "Password is required");
    }
    validator.finish()?;

    let user = store
        .find_user_by_email(&email)
        .await?
        .filter(|user| user.is_active)
        .filter(|user| verify_password(&password, &user.password_hash))
        .ok_or(ServiceError::NotAuthenticated("Invalid credentials"))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Session {
        token: issue_session_token(keys, &user, now)?,
        user: project_user(&user),
    })
}

/// ## Summary
/// Issues a fresh invite token on the admin's own record. Nothing is sent:
/// the returned link is handed to the invitee by the admin.
///
/// ## Side Effects
/// Overwrites any earlier token held by the admin.
///
/// ## Errors
/// - 403 "Insufficient permissions" for non-admins
/// - 400 validation error for a malformed email
/// - 400 "Email already registered or invited" when the email is taken
#[tracing::instrument(skip_all, fields(admin_id = actor.id))]
pub async fn invite(
    store: &dyn Store,
    auth: &AuthConfig,
    actor: &User,
    request: InviteRequest,
    now: DateTime<Utc>,
) -> ServiceResult<InviteIssued> {
    if actor.role != Role::Admin {
        return Err(ServiceError::Forbidden("Insufficient permissions"));
    }

    let mut validator = Validator::new();
    let email = check_email(&mut validator, request.email.as_deref());
    validator.finish()?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::Conflict("Email already registered or invited"));
    }

    let token = generate_invite_token();
    let expires_at = now + Duration::days(auth.invite_ttl_days);
    store.set_invite_token(actor.id, &token, expires_at).await?;

    tracing::info!(%expires_at, "Invite issued");

    Ok(InviteIssued {
        expires_at,
        invite_url: auth.invite_url(&token),
    })
}

#[must_use]
pub fn me(actor: &User) -> UserView {
    project_user(actor)
}

/// ## Summary
/// Changes the caller's display name and/or language preference.
///
/// ## Errors
/// Returns validation errors for a blank name or unknown language.
#[tracing::instrument(skip_all, fields(user_id = actor.id))]
pub async fn update_profile(
    store: &dyn Store,
    actor: &User,
    request: ProfileRequest,
) -> ServiceResult<UserView> {
    let mut validator = Validator::new();
    let name = request.name.map(|n| n.trim().to_string());
    if name.as_deref().is_some_and(str::is_empty) {
        validator.body("name", "Name cannot be empty");
    }
    let language_pref = request.language_pref.as_deref().and_then(|code| {
        let parsed = Language::parse(code);
        if parsed.is_none() {
            validator.body("languagePref", "Language must be either en or es");
        }
        parsed
    });
    validator.finish()?;

    let user = store
        .update_user_profile(
            actor.id,
            UserProfileChanges {
                name,
                language_pref,
            },
        )
        .await?
        .ok_or(ServiceError::NotAuthenticated("Invalid or inactive user"))?;

    Ok(project_user(&user))
}

/// ## Summary
/// Creates the configured bootstrap admin unless a user with that email exists.
///
/// ## Errors
/// Returns an error if the store fails or the password cannot be hashed.
pub async fn ensure_bootstrap_admin(
    store: &dyn Store,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> ServiceResult<Option<User>> {
    let email = normalize_email(email);
    if store.find_user_by_email(&email).await?.is_some() {
        tracing::debug!("Bootstrap admin already present");
        return Ok(None);
    }

    let user = store
        .create_user(NewUser {
            email,
            password_hash: hash_password(password)?,
            name: name.map(str::to_owned),
            role: Role::Admin,
            language_pref: Language::En,
            invited_by_id: None,
        })
        .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(Some(user))
}
