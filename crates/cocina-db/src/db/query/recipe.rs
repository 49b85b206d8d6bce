use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::escape_like;
use crate::db::connection::DbConnection;
use crate::db::enums::Language;
use crate::db::schema::{favorites, recipes};
use crate::model::recipe::{Recipe, RecipeContent, RecipeFilter};

type BoxedQuery<'a> = recipes::BoxedQuery<'a, diesel::pg::Pg, recipes::SqlType>;

/// ## Summary
/// Returns a query over public recipes narrowed by `filter`.
#[must_use]
pub fn public_filtered(filter: &RecipeFilter) -> BoxedQuery<'static> {
    let mut query = recipes::table
        .filter(recipes::is_public.eq(true))
        .into_boxed();

    if let Some(category) = &filter.category {
        query = query.filter(recipes::categories.contains(vec![category.clone()]));
    }

    if let Some(tag) = &filter.tag {
        query = query.filter(recipes::tags.contains(vec![tag.clone()]));
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        query = match filter.language {
            Language::En => query.filter(
                recipes::title_en
                    .ilike(pattern.clone())
                    .or(recipes::instructions_en.ilike(pattern)),
            ),
            Language::Es => query.filter(
                recipes::title_es
                    .ilike(pattern.clone())
                    .or(recipes::instructions_es.ilike(pattern)),
            ),
        };
    }

    query
}

/// ## Summary
/// Lists one page of public recipes, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_public(
    conn: &mut DbConnection<'_>,
    filter: &RecipeFilter,
    offset: i64,
    limit: i64,
) -> QueryResult<Vec<Recipe>> {
    public_filtered(filter)
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .offset(offset)
        .limit(limit)
        .select(Recipe::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_public(conn: &mut DbConnection<'_>, filter: &RecipeFilter) -> QueryResult<i64> {
    public_filtered(filter).count().get_result(conn).await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn by_author(conn: &mut DbConnection<'_>, author_id: i32) -> QueryResult<Vec<Recipe>> {
    recipes::table
        .filter(recipes::author_id.eq(author_id))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select(Recipe::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists the recipes a user has favorited, most recently favorited first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn favorited_by(conn: &mut DbConnection<'_>, user_id: i32) -> QueryResult<Vec<Recipe>> {
    favorites::table
        .inner_join(recipes::table)
        .filter(favorites::user_id.eq(user_id))
        .order((favorites::created_at.desc(), favorites::id.desc()))
        .select(Recipe::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_recipe(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<Option<Recipe>> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_recipe(
    conn: &mut DbConnection<'_>,
    author_id: i32,
    content: &RecipeContent,
) -> QueryResult<Recipe> {
    diesel::insert_into(recipes::table)
        .values((recipes::author_id.eq(author_id), content))
        .returning(Recipe::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_recipe(
    conn: &mut DbConnection<'_>,
    id: i32,
    content: &RecipeContent,
) -> QueryResult<Option<Recipe>> {
    diesel::update(recipes::table.find(id))
        .set((content, recipes::updated_at.eq(Utc::now())))
        .returning(Recipe::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a recipe; comments, favorites and media rows cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_recipe(conn: &mut DbConnection<'_>, id: i32) -> QueryResult<usize> {
    diesel::delete(recipes::table.find(id)).execute(conn).await
}
