//! Configuration, shared constants and the core error type for the family
//! recipes service. Nothing in here touches the database or HTTP layers.

pub mod config;
pub mod constants;
pub mod error;
pub mod util;
