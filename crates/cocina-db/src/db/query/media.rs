use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::media;
use crate::model::media::{Media, NewMedia};

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_media(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<Media>> {
    media::table
        .find(id)
        .select(Media::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists media for the given recipes in display order.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn for_recipes(
    conn: &mut DbConnection<'_>,
    recipe_ids: &[i32],
) -> QueryResult<Vec<Media>> {
    media::table
        .filter(media::recipe_id.eq_any(recipe_ids))
        .order((media::recipe_id.asc(), media::position.asc(), media::id.asc()))
        .select(Media::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Returns the position for the next upload: one past the current maximum, or 0.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn next_position(conn: &mut DbConnection<'_>, recipe_id: i32) -> QueryResult<i32> {
    let current: Option<i32> = media::table
        .filter(media::recipe_id.eq(recipe_id))
        .select(diesel::dsl::max(media::position))
        .get_result(conn)
        .await?;

    Ok(current.map_or(0, |max| max + 1))
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_media(
    conn: &mut DbConnection<'_>,
    new_media: &NewMedia,
    position: i32,
) -> QueryResult<Media> {
    diesel::insert_into(media::table)
        .values((new_media, media::position.eq(position)))
        .returning(Media::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_media(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<usize> {
    diesel::delete(media::table.find(id)).execute(conn).await
}
