//! HTTP surface of the family recipes API.
//!
//! ## Module Organization
//!
//! - `app`: service assembly and the `/api` routers
//! - `config`: settings injection into the depot
//! - `error`: HTTP-layer errors and JSON error bodies
//! - `media_handler` / `store_handler`: depot injection of the media host and store
//! - `middleware`: identity resolution, rate limiting and the error catcher

pub mod app;
pub mod config;
pub mod error;
pub mod media_handler;
pub mod middleware;
pub mod store_handler;
