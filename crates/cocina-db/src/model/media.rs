use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::enums::MediaType;
use crate::db::schema::media;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Media {
    pub id: i32,
    pub recipe_id: i32,
    pub url: String,
    pub media_type: MediaType,
    pub public_id: Option<String>,
    pub alt_text: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// A stored upload awaiting a row. The store assigns `position`.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = media)]
pub struct NewMedia {
    pub recipe_id: i32,
    pub url: String,
    pub media_type: MediaType,
    pub public_id: Option<String>,
    pub alt_text: Option<String>,
}
