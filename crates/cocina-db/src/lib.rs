//! Persistence for users, recipes, comments, favorites and media.
//!
//! The [`store::Store`] trait is the only surface the service layer sees. It is
//! implemented over PostgreSQL ([`store::pg::PgStore`]) and in memory
//! ([`store::memory::MemoryStore`]).

pub mod db;
pub mod error;
pub mod model;
pub mod store;
