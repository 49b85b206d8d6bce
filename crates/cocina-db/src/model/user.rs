use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::enums::{Language, Role};
use crate::db::schema::users;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    pub language_pref: Language,
    pub is_active: bool,
    pub invite_token: Option<String>,
    pub invite_expires_at: Option<DateTime<Utc>>,
    pub invited_by_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// ## Summary
    /// Returns the live invite token, treating an expired one as absent.
    #[must_use]
    pub fn live_invite_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.invite_token, self.invite_expires_at) {
            (Some(token), Some(expires_at)) if expires_at > now => Some(token.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    pub language_pref: Language,
    pub invited_by_id: Option<i32>,
}

/// Profile fields a user may change about themselves. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserProfileChanges {
    pub name: Option<String>,
    pub language_pref: Option<Language>,
}

impl UserProfileChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.language_pref.is_none()
    }
}

/// The public face of a user attached to recipes and comments.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthorSummary {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
