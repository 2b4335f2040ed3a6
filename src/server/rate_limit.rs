use crate::server::auth::bearer_token;
use crate::server::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const WINDOW_MS: i64 = 60_000;
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Request count for one client within the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at_ms: i64,
}

/// Storage for per-client request windows
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key`, opening a fresh window if the old one expired
    fn hit(&self, key: &str, now_ms: i64, window_ms: i64) -> RateLimitEntry;

    /// Drop windows that ended before `now_ms`; returns how many were removed
    fn purge_expired(&self, now_ms: i64) -> usize;
}

/// Single-process store
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn hit(&self, key: &str, now_ms: i64, window_ms: i64) -> RateLimitEntry {
        let fresh = RateLimitEntry {
            count: 0,
            reset_at_ms: now_ms + window_ms,
        };

        let mut entries = self.entries.lock();
        let entry = entries.entry(key.to_string()).or_insert(fresh);
        if entry.reset_at_ms < now_ms {
            *entry = fresh;
        }
        entry.count = entry.count.saturating_add(1);
        *entry
    }

    fn purge_expired(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at_ms >= now_ms);
        before - entries.len()
    }
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub limit: u32,
    pub remaining: u32,
    /// Window end in epoch seconds
    pub reset_at_secs: i64,
    /// Set when the request is over quota
    pub retry_after_secs: Option<i64>,
}

/// Fixed-window limiter in front of the API
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    limit: u32,
    window_ms: i64,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, limit: u32) -> Self {
        Self {
            store,
            limit,
            window_ms: WINDOW_MS,
        }
    }

    pub fn in_memory(limit: u32) -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::default()), limit)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn check(&self, key: &str, now_ms: i64) -> RateLimitDecision {
        let entry = self.store.hit(key, now_ms, self.window_ms);

        let retry_after_secs = if entry.count > self.limit {
            Some(ceil_secs(entry.reset_at_ms - now_ms))
        } else {
            None
        };

        RateLimitDecision {
            limit: self.limit,
            remaining: self.limit.saturating_sub(entry.count),
            reset_at_secs: ceil_secs(entry.reset_at_ms),
            retry_after_secs,
        }
    }

    /// Periodically evict expired windows so the table does not grow unbounded
    pub fn spawn_cleanup(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter
                    .store
                    .purge_expired(chrono::Utc::now().timestamp_millis());
                if removed > 0 {
                    tracing::debug!("Rate limiter evicted {} expired entries", removed);
                }
            }
        })
    }
}

fn ceil_secs(ms: i64) -> i64 {
    (ms + 999).div_euclid(1000)
}

/// Identify the caller by API key, then by proxy headers
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(token) = bearer_token(headers) {
        return token.to_string();
    }

    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header_value("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_value("x-real-ip"))
        .unwrap_or("unknown")
        .to_string()
}

/// Count the request, reject it when over quota, and attach rate-limit headers
pub async fn enforce_rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_identifier(request.headers());
    let decision = state
        .rate_limiter
        .check(&key, chrono::Utc::now().timestamp_millis());

    let mut response = match decision.retry_after_secs {
        Some(retry_after) => {
            tracing::warn!("Rate limit exceeded for client on {}", request.uri().path());
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "success": false,
                    "error": "Too many requests. Please try again later.",
                    "retryAfter": retry_after
                })),
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
        None => next.run(request).await,
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_at_secs));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_counts_and_rejects_over_limit() {
        let limiter = RateLimiter::in_memory(2);
        let now = 1_700_000_000_000;

        let first = limiter.check("k", now);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.retry_after_secs, None);
        assert_eq!(first.reset_at_secs, (now + WINDOW_MS) / 1000);

        let second = limiter.check("k", now + 10);
        assert_eq!(second.remaining, 0);
        assert_eq!(second.retry_after_secs, None);

        let third = limiter.check("k", now + 30_000);
        assert_eq!(third.remaining, 0);
        assert_eq!(third.retry_after_secs, Some(30));

        // separate clients have separate windows
        assert_eq!(limiter.check("other", now + 30_000).retry_after_secs, None);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::in_memory(1);
        let now = 1_000_000;

        limiter.check("k", now);
        assert!(limiter.check("k", now + 1).retry_after_secs.is_some());

        let later = limiter.check("k", now + WINDOW_MS + 1);
        assert_eq!(later.retry_after_secs, None);
        assert_eq!(later.remaining, 0);
    }

    #[test]
    fn test_purge_expired() {
        let store = InMemoryRateLimitStore::default();
        store.hit("old", 0, WINDOW_MS);
        store.hit("new", 50_000, WINDOW_MS);

        assert_eq!(store.purge_expired(WINDOW_MS + 1), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(200_000), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_client_identifier_precedence() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identifier(&headers), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_identifier(&headers), "10.0.0.9");

        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(client_identifier(&headers), "203.0.113.7");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer key-1"));
        assert_eq!(client_identifier(&headers), "key-1");
    }
}
