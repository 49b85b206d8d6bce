//! Access control, localization and the per-resource orchestration of the
//! family recipes API.
//!
//! ## Module Organization
//!
//! - `auth`: credentials, session and invite tokens, identity resolution, the access policy
//! - `localize`: single-language response shapes with English fallback
//! - `media`: the external media host seam and its Cloudinary client
//! - `resource`: one orchestrator module per HTTP resource
//! - `validate`: field-level validation errors

pub mod auth;
pub mod error;
pub mod localize;
pub mod media;
pub mod resource;
pub mod validate;
