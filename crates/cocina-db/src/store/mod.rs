//! The data store contract consumed by the service layer.
//!
//! ## Summary
//! `Store` exposes one method per persistence need of the orchestrators. Both
//! implementations enforce the same uniqueness rules (user email, one favorite
//! per user and recipe) and report violations as [`DbError::UniqueViolation`].
//!
//! [`DbError::UniqueViolation`]: crate::error::DbError::UniqueViolation

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbResult;
use crate::model::comment::{Comment, CommentRecord, NewComment};
use crate::model::favorite::Favorite;
use crate::model::media::{Media, NewMedia};
use crate::model::recipe::{Recipe, RecipeContent, RecipeFilter, RecipeRecord};
use crate::model::user::{NewUser, User, UserProfileChanges};

pub mod memory;
pub mod pg;

pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";
pub const FAVORITES_PAIR_CONSTRAINT: &str = "favorites_user_recipe_key";

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_id(&self, id: i32) -> DbResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Finds the user holding `token` as an invite token that expires after `now`.
    async fn find_inviter_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<User>>;

    async fn create_user(&self, new_user: NewUser) -> DbResult<User>;

    /// Stores an invite token on `user_id`, replacing any earlier one.
    async fn set_invite_token(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()>;

    /// Atomically consumes the inviter's token and creates the invited user.
    ///
    /// Returns `None` without creating anything when the inviter no longer holds
    /// `token` or it has expired by `now`.
    async fn register_invited_user(
        &self,
        inviter_id: i32,
        token: &str,
        now: DateTime<Utc>,
        new_user: NewUser,
    ) -> DbResult<Option<User>>;

    async fn update_user_profile(
        &self,
        user_id: i32,
        changes: UserProfileChanges,
    ) -> DbResult<Option<User>>;

    /// One page of public recipes matching `filter`, newest first, plus the total match count.
    async fn list_public_recipes(
        &self,
        filter: &RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<RecipeRecord>, i64)>;

    async fn list_recipes_by_author(&self, author_id: i32) -> DbResult<Vec<RecipeRecord>>;

    async fn find_recipe(&self, id: i32) -> DbResult<Option<Recipe>>;

    async fn find_recipe_record(&self, id: i32) -> DbResult<Option<RecipeRecord>>;

    async fn create_recipe(&self, author_id: i32, content: RecipeContent) -> DbResult<Recipe>;

    async fn update_recipe(&self, id: i32, content: RecipeContent) -> DbResult<Option<Recipe>>;

    /// Deletes a recipe with its comments, favorites and media. Returns the removed
    /// media so external objects can be released, or `None` if the recipe was absent.
    async fn delete_recipe(&self, id: i32) -> DbResult<Option<Vec<Media>>>;

    async fn list_comments(&self, recipe_id: i32) -> DbResult<Vec<CommentRecord>>;

    async fn find_comment(&self, id: i32) -> DbResult<Option<Comment>>;

    async fn create_comment(&self, new_comment: NewComment) -> DbResult<CommentRecord>;

    async fn update_comment(&self, id: i32, content: &str) -> DbResult<Option<CommentRecord>>;

    async fn delete_comment(&self, id: i32) -> DbResult<bool>;

    /// Recipes favorited by `user_id`, most recently favorited first.
    async fn list_favorite_recipes(&self, user_id: i32) -> DbResult<Vec<RecipeRecord>>;

    async fn create_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<Favorite>;

    async fn delete_favorite(&self, user_id: i32, recipe_id: i32) -> DbResult<bool>;

    async fn find_media(&self, id: i32) -> DbResult<Option<Media>>;

    /// Inserts media at one past the recipe's current maximum position.
    async fn create_media(&self, new_media: NewMedia) -> DbResult<Media>;

    async fn delete_media(&self, id: i32) -> DbResult<bool>;
}
