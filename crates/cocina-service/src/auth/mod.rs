//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: resolves a bearer header to an [`authenticate::Identity`]
//! - `depot`: depot keys and helpers for reading the resolved identity in handlers
//! - `invite`: opaque invite token generation
//! - `password`: password hashing and verification with Argon2
//! - `policy`: the `can_access` decision function
//! - `token`: signed session tokens

pub mod authenticate;
pub mod depot;
pub mod invite;
pub mod password;
pub mod policy;
pub mod token;

pub use authenticate::{AnonymousReason, Identity, resolve_identity};
pub use policy::{Action, Principal, Resource, ResourceKind, Visibility, can_access};
pub use token::{SessionClaims, SessionKeys};
