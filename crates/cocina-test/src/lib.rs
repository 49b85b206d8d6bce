//! Family recipes API - integration test support.
//!
//! Re-exports the workspace crates so HTTP tests can reach everything through
//! `cocina_test::` paths.

pub use cocina_app as app;
pub use cocina_core as common;
pub use cocina_db as db;
pub use cocina_service as service;
