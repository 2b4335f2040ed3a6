//! HTTP surface of the gateway.

pub mod auth;
pub mod rate_limit;
pub mod routes;
pub mod state;

use crate::analysis::ControlAnalysisService;
use crate::config::GatewayConfig;
use crate::llm::create_provider;
use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use auth::{ApiKeyStore, StaticApiKeys};
pub use rate_limit::{InMemoryRateLimitStore, RateLimitStore, RateLimiter};
pub use state::AppState;

/// Build the router; rate limiting runs before authentication
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route(auth::HEALTH_PATH, get(routes::health))
        .route("/api/analyze-control", post(routes::analyze_control))
        .route("/api/test-connection", post(routes::test_connection))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce_rate_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire provider, service and middleware from `config` and serve until Ctrl-C
pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    info!("Starting LLM Service...");

    let provider = create_provider(&config.provider).context("Failed to initialize LLM provider")?;
    let service = ControlAnalysisService::new(provider);

    let api_keys = StaticApiKeys::new(config.server.api_keys.clone());
    if api_keys.is_enabled() {
        info!("Auth: enabled ({} key(s))", api_keys.len());
    } else {
        info!("Auth: DISABLED (no API_KEYS set)");
    }

    let rate_limiter = Arc::new(RateLimiter::in_memory(config.server.rate_limit_rpm));
    info!("Rate limit: {} requests/minute", rate_limiter.limit());
    let cleanup = rate_limiter.spawn_cleanup();

    let state = AppState::new(service, Arc::new(api_keys), rate_limiter);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("LLM Service is running at http://{}", addr);
    info!("  POST /api/analyze-control - Analyze an ISO 27001 control");
    info!("  POST /api/test-connection - Check the LLM backend");
    info!("  GET  /api/health - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("LLM Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, GenerateOptions, GenerationResult, LlmError, LlmProvider};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct EchoProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _options: Option<&GenerateOptions>,
        ) -> Result<GenerationResult, LlmError> {
            match self.reply {
                Some(text) => Ok(GenerationResult {
                    text: text.to_string(),
                    raw: json!({}),
                }),
                None => Err(LlmError::Api {
                    provider: "echo",
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }
    }

    fn app(reply: Option<&'static str>, keys: &[&str], rpm: u32) -> Router {
        let service = ControlAnalysisService::new(Arc::new(EchoProvider { reply }));
        let keys = StaticApiKeys::new(keys.iter().map(|k| k.to_string()).collect());
        let state = AppState::new(service, Arc::new(keys), Arc::new(RateLimiter::in_memory(rpm)));
        build_router(state)
    }

    fn analyze_request(body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/analyze-control")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn control_body() -> Value {
        json!({
            "controlCode": "A.5.1",
            "title": "Policies",
            "description": "Policies for information security",
            "guidance": "Define and approve",
            "status": "partial",
            "currentPractice": "Draft exists",
            "evidenceDescription": null,
            "userContext": "Startup"
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_skips_auth() {
        let response = app(Some("x"), &["secret"], 10)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok", "service": "llm-service"}));
    }

    #[tokio::test]
    async fn test_analyze_control_success_envelope() {
        let response = app(Some("GAP: none"), &["secret"], 10)
            .oneshot(analyze_request(control_body(), Some("secret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "10");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "9");
        assert!(response.headers().contains_key("x-ratelimit-reset"));
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "data": {"aiSuggestion": "GAP: none"}})
        );
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_unauthorized() {
        for token in [None, Some("wrong")] {
            let response = app(Some("x"), &["secret"], 10)
                .oneshot(analyze_request(control_body(), token))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers()[header::WWW_AUTHENTICATE],
                r#"Bearer realm="llm-service""#
            );
            let body = json_body(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Unauthorized: Invalid or missing API key");
        }
    }

    #[tokio::test]
    async fn test_auth_disabled_without_keys() {
        let response = app(Some("ok"), &[], 10)
            .oneshot(analyze_request(control_body(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_body_returns_error_envelope() {
        let response = app(Some("x"), &[], 10)
            .oneshot(analyze_request(json!({"controlCode": "A.5.1"}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_bad_gateway() {
        let response = app(None, &[], 10)
            .oneshot(analyze_request(control_body(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("A.5.1"));
    }

    #[tokio::test]
    async fn test_connection_endpoint() {
        let response = app(Some("Hello! LLM connection is working."), &[], 10)
            .oneshot(
                Request::post("/api/test-connection")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "data": {
                    "aiSuggestion": "Hello! LLM connection is working.",
                    "testMode": true,
                    "connectionStatus": "ok"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_before_auth() {
        let router = app(Some("x"), &["secret"], 1);

        let first = router
            .clone()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // same anonymous client, no credentials: quota is checked first
        let second = router
            .oneshot(analyze_request(control_body(), None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(second.headers()["x-ratelimit-remaining"], "0");

        let body = json_body(second).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Too many requests. Please try again later.");
        assert!(body["retryAfter"].as_i64().unwrap() > 0);
    }
}
