use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::users;
use crate::model::user::{AuthorSummary, NewUser, User, UserProfileChanges};

type BoxedQuery<'a> = users::BoxedQuery<'a, diesel::pg::Pg, users::SqlType>;

/// ## Summary
/// Returns a query to select all users.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    users::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a user by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(users::id.eq(id))
}

/// ## Summary
/// Returns a query to find a user by email.
#[must_use]
pub fn by_email(email: &str) -> BoxedQuery<'_> {
    all().filter(users::email.eq(email))
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_user(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<User>> {
    by_id(id)
        .select(User::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_user_by_email(
    conn: &mut DbConnection<'_>,
    email: &str,
) -> QueryResult<Option<User>> {
    by_email(email)
        .select(User::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Finds the user holding `token` as a live (unexpired) invite token.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_inviter_by_token(
    conn: &mut DbConnection<'_>,
    token: &str,
    now: DateTime<Utc>,
) -> QueryResult<Option<User>> {
    all()
        .filter(users::invite_token.eq(token))
        .filter(users::invite_expires_at.gt(now))
        .select(User::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the insert fails, including a unique violation on email.
pub async fn create_user(conn: &mut DbConnection<'_>, new_user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Stores an invite token on a user, overwriting any previous one.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn set_invite_token(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    token: &str,
    expires_at: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set((
            users::invite_token.eq(token),
            users::invite_expires_at.eq(expires_at),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await
}

/// ## Summary
/// Clears the inviter's token only if it still equals `token` and has not expired.
/// Returns the number of rows changed (0 or 1).
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn consume_invite_token(
    conn: &mut DbConnection<'_>,
    inviter_id: i32,
    token: &str,
    now: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        users::table
            .filter(users::id.eq(inviter_id))
            .filter(users::invite_token.eq(token))
            .filter(users::invite_expires_at.gt(now)),
    )
    .set((
        users::invite_token.eq(None::<String>),
        users::invite_expires_at.eq(None::<DateTime<Utc>>),
        users::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_profile(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    changes: &UserProfileChanges,
) -> QueryResult<Option<User>> {
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set((changes, users::updated_at.eq(Utc::now())))
        .returning(User::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn authors_by_ids(
    conn: &mut DbConnection<'_>,
    ids: &[i32],
) -> QueryResult<Vec<AuthorSummary>> {
    users::table
        .filter(users::id.eq_any(ids))
        .select(AuthorSummary::as_select())
        .load(conn)
        .await
}
