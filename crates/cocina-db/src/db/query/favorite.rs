use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::favorites;
use crate::model::favorite::{Favorite, NewFavorite};

/// ## Errors
/// Returns a database error if the insert fails, including a unique violation
/// when the pair is already favorited.
pub async fn create_favorite(
    conn: &mut DbConnection<'_>,
    new_favorite: NewFavorite,
) -> QueryResult<Favorite> {
    diesel::insert_into(favorites::table)
        .values(new_favorite)
        .returning(Favorite::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_favorite(
    conn: &mut DbConnection<'_>,
    user_id: i32,
    recipe_id: i32,
) -> QueryResult<usize> {
    diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    )
    .execute(conn)
    .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn counts_by_recipe(
    conn: &mut DbConnection<'_>,
    recipe_ids: &[i32],
) -> QueryResult<Vec<(i32, i64)>> {
    favorites::table
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .group_by(favorites::recipe_id)
        .select((favorites::recipe_id, diesel::dsl::count_star()))
        .load(conn)
        .await
}
