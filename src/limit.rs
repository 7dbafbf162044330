//! Token-bucket rate limiting for the submission endpoint.

use std::sync::Mutex;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Simple token-bucket limiter, one global bucket.
///
/// Submissions fan out to the external agent service, so the bucket guards
/// that upstream rather than per-client fairness.
#[derive(Debug)]
pub struct SimpleRateLimiter {
    // (last_update, tokens)
    state: Mutex<(Instant, f32)>,
    rate_per_sec: f32,
    burst_size: f32,
}

impl SimpleRateLimiter {
    #[must_use]
    pub fn new(rate_per_sec: f32, burst_size: f32) -> Self {
        Self {
            state: Mutex::new((Instant::now(), burst_size)),
            rate_per_sec,
            burst_size,
        }
    }

    /// Take one token; false when the bucket is empty.
    pub fn check(&self) -> bool {
        let mut guard = self.state.lock().unwrap();
        let (last_update, tokens) = *guard;
        let now = Instant::now();
        let elapsed = now.duration_since(last_update).as_secs_f32();

        let mut new_tokens = tokens + elapsed * self.rate_per_sec;
        if new_tokens > self.burst_size {
            new_tokens = self.burst_size;
        }

        if new_tokens >= 1.0 {
            *guard = (now, new_tokens - 1.0);
            true
        } else {
            // Reflect time passage even when denying.
            *guard = (now, new_tokens);
            false
        }
    }
}

/// Middleware enforcing the limiter on the routes it wraps.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if state.config.resilience.rate_limit_enabled && !state.limiter.check() {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }
    Ok(next.run(req).await)
}
