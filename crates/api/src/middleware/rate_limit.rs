//! Per-employee rate limiting.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use serde_json::json;
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::user_auth::UserAuth;

/// Keyed limiter shared across requests, one bucket per employee.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<Uuid>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when the limit is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    pub fn limit(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// `Err(retry_after_secs)` when the employee is over quota.
    pub fn check(&self, employee_id: Uuid) -> Result<(), u64> {
        self.limiter.check_key(&employee_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_keys", &self.limiter.len())
            .finish()
    }
}

/// Applies the per-employee quota. Must run after `require_user_auth`;
/// requests without an authenticated employee pass through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let employee_id = match req.extensions().get::<UserAuth>() {
        Some(auth) => auth.employee_id,
        None => return next.run(req).await,
    };

    if let Some(ref rate_limiter) = state.rate_limiter {
        if let Err(retry_after) = rate_limiter.check(employee_id) {
            tracing::warn!(employee_id = %employee_id, "Rate limit exceeded");
            return rate_limited_response(rate_limiter.limit(), retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_disables() {
        assert!(RateLimiterState::new(0).is_none());
    }

    #[test]
    fn test_quota_is_per_employee() {
        let state = RateLimiterState::new(2).unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(state.check(alice).is_ok());
        assert!(state.check(alice).is_ok());
        let retry_after = state.check(alice).unwrap_err();
        assert!(retry_after >= 1);

        assert!(state.check(bob).is_ok());
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let response = rate_limited_response(60, 5);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "5");
    }
}
