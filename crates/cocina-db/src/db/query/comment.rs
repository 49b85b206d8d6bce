use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{comments, users};
use crate::model::comment::{Comment, NewComment};
use crate::model::user::AuthorSummary;

/// ## Summary
/// Lists a recipe's comments with their authors, oldest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_for_recipe(
    conn: &mut DbConnection<'_>,
    recipe_id: i32,
) -> QueryResult<Vec<(Comment, AuthorSummary)>> {
    comments::table
        .inner_join(users::table)
        .filter(comments::recipe_id.eq(recipe_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((Comment::as_select(), AuthorSummary::as_select()))
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_comment(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<Comment>> {
    comments::table
        .find(id)
        .select(Comment::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_with_author(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> QueryResult<Option<(Comment, AuthorSummary)>> {
    comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id))
        .select((Comment::as_select(), AuthorSummary::as_select()))
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_comment(
    conn: &mut DbConnection<'_>,
    new_comment: &NewComment,
) -> QueryResult<Comment> {
    diesel::insert_into(comments::table)
        .values(new_comment)
        .returning(Comment::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_content(
    conn: &mut DbConnection<'_>,
    id: i32,
    content: &str,
) -> QueryResult<usize> {
    diesel::update(comments::table.find(id))
        .set((
            comments::content.eq(content),
            comments::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_comment(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<usize> {
    diesel::delete(comments::table.find(id)).execute(conn).await
}

/// ## Summary
/// Counts comments per recipe for the given recipe ids.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn counts_by_recipe(
    conn: &mut DbConnection<'_>,
    recipe_ids: &[i32],
) -> QueryResult<Vec<(i32, i64)>> {
    comments::table
        .filter(comments::recipe_id.eq_any(recipe_ids))
        .group_by(comments::recipe_id)
        .select((comments::recipe_id, diesel::dsl::count_star()))
        .load(conn)
        .await
}
