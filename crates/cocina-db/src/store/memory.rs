//! In-process implementation of [`Store`].
//!
//! Backs the test suites and `memory:` database URLs. Semantics follow the SQL
//! schema: serial ids, unique email and favorite pair, cascading recipe deletes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{FAVORITES_PAIR_CONSTRAINT, Store, USERS_EMAIL_CONSTRAINT};
use crate::error::{DbError, DbResult};
use crate::model::comment::{Comment, CommentRecord, NewComment};
use crate::model::favorite::Favorite;
use crate::model::media::{Media, NewMedia};
use crate::model::recipe::{Recipe, RecipeContent, RecipeFilter, RecipeRecord};
use crate::model::user::{AuthorSummary, NewUser, User, UserProfileChanges};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    comments: Vec<Comment>,
    favorites: Vec<Favorite>,
    media: Vec<Media>,
    next_user_id: i32,
    next_recipe_id: i32,
    next_comment_id: i32,
    next_favorite_id: i32,
    next_media_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    fn author(&self, user_id: i32) -> DbResult<AuthorSummary> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(AuthorSummary::from)
            .ok_or_else(|| {
                cocina_core::error::CoreError::InvariantViolation("author row missing").into()
            })
    }

    fn record(&self, recipe: &Recipe) -> DbResult<RecipeRecord> {
        let mut media: Vec<Media> = self
            .media
            .iter()
            .filter(|m| m.recipe_id == recipe.id)
            .cloned()
            .collect();
        media.sort_by_key(|m| (m.position, m.id));

        Ok(RecipeRecord {
            author: self.author(recipe.author_id)?,
            media,
            comments_count: count_where(&self.comments, |c| c.recipe_id == recipe.id),
            favorites_count: count_where(&self.favorites, |f| f.recipe_id == recipe.id),
            recipe: recipe.clone(),
        })
    }

    fn insert_user(&mut self, new_user: NewUser, now: DateTime<Utc>) -> DbResult<User> {
        if self.users.iter().any(|u| u.email == new_user.email) {
            return Err(DbError::UniqueViolation {
                constraint: Some(USERS_EMAIL_CONSTRAINT.to_string()),
            });
        }

        let user = User {
            id: next_id(&mut self.next_user_id),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            role: new_user.role,
            language_pref: new_user.language_pref,
            is_active: true,
            invite_token: None,
            invite_expires_at: None,
            invited_by_id: new_user.invited_by_id,
            created_at: now,
            updated_at: now,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn comment_record(&self, comment: &Comment) -> DbResult<CommentRecord> {
        Ok(CommentRecord {
            author: self.author(comment.author_id)?,
            comment: comment.clone(),
        })
    }
}

fn count_where<T>(rows: &[T], predicate: impl Fn(&T) -> bool) -> i64 {
    i64::try_from(rows.iter().filter(|row| predicate(row)).count()).unwrap_or(i64::MAX)
}

fn newest_first(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Flips a user's active flag. Deactivation is an operator action with no
    /// HTTP surface.
    pub async fn set_user_active(&self, user_id: i32, is_active: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// ## Summary
    /// Number of favorite rows, for asserting uniqueness in tests.
    pub async fn favorite_count(&self) -> usize {
        self.tables.read().await.favorites.len()
    }

    /// ## Summary
    /// Number of user rows, for asserting that failed registrations create nothing.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, id: i32) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_inviter_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.live_invite_token(now) == Some(token))
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> DbResult<User> {
        let mut tables = self.tables.write().await;
        tables.insert_user(new_user, Utc::now())
    }

    async fn set_invite_token(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.invite_token = Some(token.to_string());
            user.invite_expires_at = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn register_invited_user(
        &self,
        inviter_id: i32,
        token: &str,
        now: DateTime<Utc>,
        new_user: NewUser,
    ) -> DbResult<Option<User>> {
        let mut tables = self.tables.write().await;

        let holds_token = tables
            .users
            .iter()
            .any(|u| u.id == inviter_id && u.live_invite_token(now) == Some(token));
        if !holds_token {
            return Ok(None);
        }

        // Insert first so a duplicate email leaves the token in place.
        let user = tables.insert_user(new_user, now)?;
        if let Some(inviter) = tables.users.iter_mut().find(|u| u.id == inviter_id) {
            inviter.invite_token = None;
            inviter.invite_expires_at = None;
            inviter.updated_at = now;
        }
        Ok(Some(user))
    }

    async fn update_user_profile(
        &self,
        user_id: i32,
        changes: UserProfileChanges,
    ) -> DbResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        if let Some(language_pref) = changes.language_pref {
            user.language_pref = language_pref;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn list_public_recipes(
        &self,
        filter: &RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<RecipeRecord>, i64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Recipe> = tables
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);

        let records = matching
            .iter()
            .skip(skip)
            .take(take)
            .map(|r| tables.record(r))
            .collect::<DbResult<Vec<_>>>()?;
        Ok((records, total))
    }

    async fn list_recipes_by_author(&self, author_id: i32) -> DbResult<Vec<RecipeRecord>> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Recipe> = tables
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut owned);
        owned.iter().map(|r| tables.record(r)).collect()
    }

    async fn find_recipe(&self, id: i32) -> DbResult<Option<Recipe>> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_recipe_record(&self, id: i32) -> DbResult<Option<RecipeRecord>> {
        let tables = self.tables.read().await;
        tables
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| tables.record(r))
            .transpose()
    }

    async fn create_recipe(&self, author_id: i32, content: RecipeContent) -> DbResult<Recipe> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let recipe = Recipe {
            id: next_id(&mut tables.next_recipe_id),
            author_id,
            title_en: content.title_en,
            title_es: content.title_es,
            ingredients_en: content.ingredients_en,
            ingredients_es: content.ingredients_es,
            instructions_en: content.instructions_en,
            instructions_es: content.instructions_es,
            prep_time: content.prep_time,
            cook_time: content.cook_time,
            servings: content.servings,
            tags: content.tags,
            categories: content.categories,
            is_public: content.is_public,
            created_at: now,
            updated_at: now,
        };
        tables.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, id: i32, content: RecipeContent) -> DbResult<Option<Recipe>> {
        let mut tables = self.tables.write().await;
        let Some(recipe) = tables.recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        recipe.title_en = content.title_en;
        recipe.title_es = content.title_es;
        recipe.ingredients_en = content.ingredients_en;
        recipe.ingredients_es = content.ingredients_es;
        recipe.instructions_en = content.instructions_en;
        recipe.instructions_es = content.instructions_es;
        recipe.prep_time = content.prep_time;
        recipe.cook_time = content.cook_time;
        recipe.servings = content.servings;
        recipe.tags = content.tags;
        recipe.categories = content.categories;
        recipe.is_public = content.is_public;
        recipe.updated_at = Utc::now();
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: i32) -> DbResult<Option<Vec<Media>>> {
        let mut tables = self.tables.write().await;
        let before = tables.recipes.len();
        tables.recipes.retain(|r| r.id != id);
        if tables.recipes.len() == before {
            return Ok(None);
        }

        tables.comments.retain(|c| c.recipe_id != id);
        tables.favorites.retain(|f| f.recipe_id != id);
        let (removed, kept): (Vec<Media>, Vec<Media>) = std::mem::take(&mut tables.media)
            .into_iter()
            .partition(|m| m.recipe_id == id);
        tables.media = kept;
        Ok(Some(removed))
    }

    async fn list_comments(&self, recipe_id: i32) -> DbResult<Vec<CommentRecord>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .iter()
            .filter(|c| c.recipe_id == recipe_id)
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        comments
            .into_iter()
            .map(|c| tables.comment_record(c))
            .collect()
    }

    async fn find_comment(&self, id: i32) -> DbResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create_comment(&self, new_comment: NewComment) -> DbResult<CommentRecord> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let comment = Comment {
            id: next_id(&mut tables.next_comment_id),
            recipe_id: new_comment.recipe_id,
            author_id: new_comment.author_id,
            content: new_comment.content,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        tables.comment_record(&comment)
    }

    async fn update_comment(&self, id: i32, content: &str) -> DbResult<Option<CommentRecord>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        let comment = comment.clone();
        tables.comment_record(&comment).map(Some)
    }

    async fn delete_comment(&self, id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() != before)
    }

    async fn list_favorite_recipes(&self, user_id: i32) -> DbResult<Vec<RecipeRecord>> {
        let tables = self.tables.read().await;
        let mut favorites: Vec<&Favorite> = tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        favorites
            .into_iter()
            .filter_map(|f| tables.recipes.iter().find(|r| r.id == f.recipe_id))
            .map(|r| tables.record(r))
            .collect()
    }

    async fn create_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<Favorite> {
        let mut tables = self.tables.write().await;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.recipe_id == recipe_id)
        {
            return Err(DbError::UniqueViolation {
                constraint: Some(FAVORITES_PAIR_CONSTRAINT.to_string()),
            });
        }

        let favorite = Favorite {
            id: next_id(&mut tables.next_favorite_id),
            user_id,
            recipe_id,
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.recipe_id == recipe_id));
        Ok(tables.favorites.len() != before)
    }

    async fn find_media(&self, id: i32) -> DbResult<Option<Media>> {
        let tables = self.tables.read().await;
        Ok(tables.media.iter().find(|m| m.id == id).cloned())
    }

    async fn create_media(&self, new_media: NewMedia) -> DbResult<Media> {
        let mut tables = self.tables.write().await;
        let position = tables
            .media
            .iter()
            .filter(|m| m.recipe_id == new_media.recipe_id)
            .map(|m| m.position)
            .max()
            .map_or(0, |max| max + 1);

        let media = Media {
            id: next_id(&mut tables.next_media_id),
            recipe_id: new_media.recipe_id,
            url: new_media.url,
            media_type: new_media.media_type,
            public_id: new_media.public_id,
            alt_text: new_media.alt_text,
            position,
            created_at: Utc::now(),
        };
        tables.media.push(media.clone());
        Ok(media)
    }

    async fn delete_media(&self, id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.media.len();
        tables.media.retain(|m| m.id != id);
        Ok(tables.media.len() != before)
    }
}
