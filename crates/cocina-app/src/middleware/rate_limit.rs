use salvo::Handler;
use salvo::rate_limiter::{CelledQuota, MokaStore, RateLimiter, RemoteIpIssuer, SlidingGuard};

use cocina_core::config::RateLimitConfig;

/// Cells the sliding window is divided into, at most one per allowed request.
const WINDOW_CELLS: usize = 15;

/// ## Summary
/// Builds the per-IP sliding-window limiter: `max_requests` per
/// `window_minutes`. Requests over the quota get 429 without queuing.
#[must_use]
pub fn rate_limiter(config: &RateLimitConfig) -> impl Handler {
    // The guard resets itself whenever its stored quota differs from the one
    // passed in, and it stores `cells` clamped to `limit`.
    let cells = WINDOW_CELLS.min(config.max_requests).max(1);
    tracing::info!(
        max_requests = config.max_requests,
        window_minutes = config.window_minutes,
        "Rate limiter configured"
    );
    RateLimiter::new(
        SlidingGuard::new(),
        MokaStore::new(),
        RemoteIpIssuer,
        CelledQuota::set_minutes(config.max_requests, cells, config.window_minutes),
    )
}
