pub mod comment;
pub mod favorite;
pub mod media;
pub mod recipe;
pub mod user;
