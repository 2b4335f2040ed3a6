use crate::server::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashSet;

/// Path that stays reachable without credentials (load balancer probes)
pub const HEALTH_PATH: &str = "/api/health";

const WWW_AUTHENTICATE: &str = r#"Bearer realm="llm-service""#;

/// Source of accepted API keys
pub trait ApiKeyStore: Send + Sync {
    /// Whether authentication is enforced at all
    fn is_enabled(&self) -> bool;

    fn contains(&self, key: &str) -> bool;

    fn len(&self) -> usize;
}

/// Fixed key set loaded at startup
#[derive(Debug, Clone, Default)]
pub struct StaticApiKeys {
    keys: HashSet<String>,
}

impl StaticApiKeys {
    pub fn new(keys: HashSet<String>) -> Self {
        Self { keys }
    }
}

impl ApiKeyStore for StaticApiKeys {
    fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a known bearer token
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.uri().path() == HEALTH_PATH || !state.api_keys.is_enabled() {
        return next.run(request).await;
    }

    let authorized = bearer_token(request.headers()).is_some_and(|token| state.api_keys.contains(token));
    if authorized {
        return next.run(request).await;
    }

    tracing::warn!("Rejected unauthenticated request to {}", request.uri().path());

    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "error": "Unauthorized: Invalid or missing API key"
        })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(WWW_AUTHENTICATE));
    response
}
