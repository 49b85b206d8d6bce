/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const AUTH_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);

pub const RECIPES_ROUTE_COMPONENT: &str = "recipes";
pub const RECIPES_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", RECIPES_ROUTE_COMPONENT);

pub const COMMENTS_ROUTE_COMPONENT: &str = "comments";
pub const COMMENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", COMMENTS_ROUTE_COMPONENT);

pub const FAVORITES_ROUTE_COMPONENT: &str = "favorites";
pub const FAVORITES_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", FAVORITES_ROUTE_COMPONENT);

pub const UPLOAD_ROUTE_COMPONENT: &str = "upload";
pub const UPLOAD_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", UPLOAD_ROUTE_COMPONENT);

pub const SHARE_ROUTE_COMPONENT: &str = "share";
pub const SHARE_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", SHARE_ROUTE_COMPONENT);

pub const HEALTH_ROUTE_COMPONENT: &str = "health";
pub const HEALTH_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", HEALTH_ROUTE_COMPONENT);

/// Random bytes behind an invite token; hex encoding doubles the length.
pub const INVITE_TOKEN_BYTES: usize = 32;
pub const INVITE_TOKEN_HEX_LEN: usize = INVITE_TOKEN_BYTES * 2;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MAX_SHARE_MESSAGE_LENGTH: usize = 500;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Message used for every 500 response outside development mode.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";
