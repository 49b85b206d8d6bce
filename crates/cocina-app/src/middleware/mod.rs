pub mod auth;
pub mod catcher;
pub mod rate_limit;
pub mod security_headers;
