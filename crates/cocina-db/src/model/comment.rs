use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::schema::comments;
use crate::model::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub recipe_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub recipe_id: i32,
    pub author_id: i32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: AuthorSummary,
}
