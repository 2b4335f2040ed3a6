//! API route handlers. Handlers only call the analysis service, never a provider.

use crate::analysis::{ControlAnalysisInput, ControlAnalysisResult};
use crate::server::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "LLM Service for ISO 27001 Control Analysis",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "analyzeControl": "POST /api/analyze-control",
            "testConnection": "POST /api/test-connection"
        }
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "llm-service" }))
}

/// Analyze one control
pub async fn analyze_control(
    State(state): State<AppState>,
    payload: Result<Json<ControlAnalysisInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };

    match state.service.analyze_control(input).await {
        Ok(result) => success_response(result),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

/// Check that the configured provider answers
pub async fn test_connection(State(state): State<AppState>) -> Response {
    match state.service.test_connection().await {
        Ok(result) => success_response(result),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

fn success_response(result: ControlAnalysisResult) -> Response {
    Json(json!({ "success": true, "data": result })).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}
