mod auth;
mod comments;
mod favorites;
mod helpers;
mod rate_limit;
mod recipes;
mod transport;
