//! `PostgreSQL` implementation of [`Store`] over a bb8 pool of diesel-async connections.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;

use super::Store;
use crate::db::DbProvider;
use crate::db::connection::{DbConnection, DbPool};
use crate::db::query;
use crate::db::transaction::with_transaction;
use crate::error::{DbError, DbResult};
use crate::model::comment::{Comment, CommentRecord, NewComment};
use crate::model::favorite::{Favorite, NewFavorite};
use crate::model::media::{Media, NewMedia};
use crate::model::recipe::{Recipe, RecipeContent, RecipeFilter, RecipeRecord};
use crate::model::user::{AuthorSummary, NewUser, User, UserProfileChanges};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// ## Summary
/// Loads authors, media and counts for `recipes`, preserving their order.
///
/// ## Errors
/// Returns a database error if any lookup fails, or an invariant violation if a
/// recipe's author row is missing.
async fn load_records(
    conn: &mut DbConnection<'_>,
    recipes: Vec<Recipe>,
) -> DbResult<Vec<RecipeRecord>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, AuthorSummary> = query::user::authors_by_ids(conn, &author_ids)
        .await?
        .into_iter()
        .map(|author| (author.id, author))
        .collect();

    let mut media_by_recipe: HashMap<i32, Vec<Media>> = HashMap::new();
    for item in query::media::for_recipes(conn, &recipe_ids).await? {
        media_by_recipe.entry(item.recipe_id).or_default().push(item);
    }

    let comment_counts: HashMap<i32, i64> = query::comment::counts_by_recipe(conn, &recipe_ids)
        .await?
        .into_iter()
        .collect();
    let favorite_counts: HashMap<i32, i64> = query::favorite::counts_by_recipe(conn, &recipe_ids)
        .await?
        .into_iter()
        .collect();

    recipes
        .into_iter()
        .map(|recipe| -> DbResult<RecipeRecord> {
            let author = authors.get(&recipe.author_id).cloned().ok_or(
                cocina_core::error::CoreError::InvariantViolation("recipe author row missing"),
            )?;
            Ok(RecipeRecord {
                author,
                media: media_by_recipe.remove(&recipe.id).unwrap_or_default(),
                comments_count: comment_counts.get(&recipe.id).copied().unwrap_or(0),
                favorites_count: favorite_counts.get(&recipe.id).copied().unwrap_or(0),
                recipe,
            })
        })
        .collect()
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_id(&self, id: i32) -> DbResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::user::find_user(&mut conn, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::user::find_user_by_email(&mut conn, email).await?)
    }

    async fn find_inviter_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::user::find_inviter_by_token(&mut conn, token, now).await?)
    }

    async fn create_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::user::create_user(&mut conn, &new_user).await?)
    }

    async fn set_invite_token(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let mut conn = self.pool.get_connection().await?;
        query::user::set_invite_token(&mut conn, user_id, token, expires_at).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, token, new_user))]
    async fn register_invited_user(
        &self,
        inviter_id: i32,
        token: &str,
        now: DateTime<Utc>,
        new_user: NewUser,
    ) -> DbResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        let token = token.to_string();

        with_transaction(&mut conn, |conn| {
            async move {
                let consumed =
                    query::user::consume_invite_token(conn, inviter_id, &token, now).await?;
                if consumed == 0 {
                    return Ok(None);
                }
                let user = query::user::create_user(conn, &new_user).await?;
                Ok(Some(user))
            }
            .scope_boxed()
        })
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: i32,
        changes: UserProfileChanges,
    ) -> DbResult<Option<User>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::user::update_profile(&mut conn, user_id, &changes).await?)
    }

    async fn list_public_recipes(
        &self,
        filter: &RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<RecipeRecord>, i64)> {
        let mut conn = self.pool.get_connection().await?;
        let total = query::recipe::count_public(&mut conn, filter).await?;
        let recipes = query::recipe::list_public(&mut conn, filter, offset, limit).await?;
        let records = load_records(&mut conn, recipes).await?;
        Ok((records, total))
    }

    async fn list_recipes_by_author(&self, author_id: i32) -> DbResult<Vec<RecipeRecord>> {
        let mut conn = self.pool.get_connection().await?;
        let recipes = query::recipe::by_author(&mut conn, author_id).await?;
        load_records(&mut conn, recipes).await
    }

    async fn find_recipe(&self, id: i32) -> DbResult<Option<Recipe>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::recipe::find_recipe(&mut conn, id).await?)
    }

    async fn find_recipe_record(&self, id: i32) -> DbResult<Option<RecipeRecord>> {
        let mut conn = self.pool.get_connection().await?;
        let Some(recipe) = query::recipe::find_recipe(&mut conn, id).await? else {
            return Ok(None);
        };
        Ok(load_records(&mut conn, vec![recipe]).await?.pop())
    }

    async fn create_recipe(&self, author_id: i32, content: RecipeContent) -> DbResult<Recipe> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::recipe::create_recipe(&mut conn, author_id, &content).await?)
    }

    async fn update_recipe(&self, id: i32, content: RecipeContent) -> DbResult<Option<Recipe>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::recipe::update_recipe(&mut conn, id, &content).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_recipe(&self, id: i32) -> DbResult<Option<Vec<Media>>> {
        let mut conn = self.pool.get_connection().await?;

        with_transaction(&mut conn, |conn| {
            async move {
                let media = query::media::for_recipes(conn, &[id]).await?;
                let deleted = query::recipe::delete_recipe(conn, id).await?;
                Ok((deleted > 0).then_some(media))
            }
            .scope_boxed()
        })
        .await
    }

    async fn list_comments(&self, recipe_id: i32) -> DbResult<Vec<CommentRecord>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::comment::list_for_recipe(&mut conn, recipe_id)
            .await?
            .into_iter()
            .map(|(comment, author)| CommentRecord { comment, author })
            .collect())
    }

    async fn find_comment(&self, id: i32) -> DbResult<Option<Comment>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::comment::find_comment(&mut conn, id).await?)
    }

    async fn create_comment(&self, new_comment: NewComment) -> DbResult<CommentRecord> {
        let mut conn = self.pool.get_connection().await?;
        let comment = query::comment::create_comment(&mut conn, &new_comment).await?;
        let author = query::user::authors_by_ids(&mut conn, &[comment.author_id])
            .await?
            .pop()
            .ok_or(cocina_core::error::CoreError::InvariantViolation(
                "comment author row missing",
            ))?;
        Ok(CommentRecord { comment, author })
    }

    async fn update_comment(&self, id: i32, content: &str) -> DbResult<Option<CommentRecord>> {
        let mut conn = self.pool.get_connection().await?;
        if query::comment::update_content(&mut conn, id, content).await? == 0 {
            return Ok(None);
        }
        Ok(query::comment::find_with_author(&mut conn, id)
            .await?
            .map(|(comment, author)| CommentRecord { comment, author }))
    }

    async fn delete_comment(&self, id: i32) -> DbResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::comment::delete_comment(&mut conn, id).await? > 0)
    }

    async fn list_favorite_recipes(&self, user_id: i32) -> DbResult<Vec<RecipeRecord>> {
        let mut conn = self.pool.get_connection().await?;
        let recipes = query::recipe::favorited_by(&mut conn, user_id).await?;
        load_records(&mut conn, recipes).await
    }

    async fn create_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<Favorite> {
        let mut conn = self.pool.get_connection().await?;
        query::favorite::create_favorite(&mut conn, NewFavorite { user_id, recipe_id })
            .await
            .map_err(DbError::from)
    }

    async fn delete_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::favorite::delete_favorite(&mut conn, user_id, recipe_id).await? > 0)
    }

    async fn find_media(&self, id: i32) -> DbResult<Option<Media>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::media::find_media(&mut conn, id).await?)
    }

    async fn create_media(&self, new_media: NewMedia) -> DbResult<Media> {
        let mut conn = self.pool.get_connection().await?;

        with_transaction(&mut conn, |conn| {
            async move {
                let position = query::media::next_position(conn, new_media.recipe_id).await?;
                Ok(query::media::create_media(conn, &new_media, position).await?)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_media(&self, id: i32) -> DbResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        Ok(query::media::delete_media(&mut conn, id).await? > 0)
    }
}
