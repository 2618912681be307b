//! Per-client fixed-window rate limiting.
//!
//! Requests past `delay_after` in a window are held for `delay_ms` per extra
//! hit before being served; requests past `max_requests` are rejected.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::RateLimitConfig;
use crate::observability::metrics;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Windows are swept once the map grows past this many clients.
const SWEEP_THRESHOLD: usize = 10_000;

/// Hits recorded for one client in the current window.
struct Window {
    started: Instant,
    hits: u32,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
    /// How long to hold the request before serving it.
    pub delay: Duration,
}

/// State for the rate limiter.
pub struct RateLimiterState {
    windows: Mutex<HashMap<IpAddr, Window>>,
    window: Duration,
    max_requests: u32,
    delay_after: u32,
    delay_step: Duration,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: Duration::from_millis(config.window_ms),
            max_requests: config.max_requests,
            delay_after: config.delay_after,
            delay_step: Duration::from_millis(config.delay_ms),
        }
    }

    /// Count a request from `client` at `now`.
    pub fn check(&self, client: IpAddr, now: Instant) -> Decision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > SWEEP_THRESHOLD {
            let span = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < span);
        }

        let entry = windows.entry(client).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.hits = 0;
        }
        entry.hits = entry.hits.saturating_add(1);

        let allowed = entry.hits <= self.max_requests;
        let delay = if allowed {
            self.delay_step * entry.hits.saturating_sub(self.delay_after)
        } else {
            Duration::ZERO
        };

        Decision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.hits),
            reset_after: self.window.saturating_sub(now.duration_since(entry.started)),
            delay,
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Middleware function for per-IP rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let decision = state.check(client, Instant::now());

    let mut response = if decision.allowed {
        if !decision.delay.is_zero() {
            tracing::debug!(client = %client, delay = ?decision.delay, "Slowing down client");
            tokio::time::sleep(decision.delay).await;
        }
        next.run(request).await
    } else {
        tracing::warn!(client = %client, limit = decision.limit, "Rate limit exceeded");
        metrics::record_rate_limited();
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "success": false,
                "message": "Too many requests, please try again later."
            })),
        )
            .into_response();
        let retry_secs = decision.reset_after.as_secs_f64().ceil() as u64;
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
        response
    };

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    response
}
