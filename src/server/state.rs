//! Shared application state

use crate::analysis::ControlAnalysisService;
use crate::server::auth::ApiKeyStore;
use crate::server::rate_limit::RateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: ControlAnalysisService,
    pub api_keys: Arc<dyn ApiKeyStore>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        service: ControlAnalysisService,
        api_keys: Arc<dyn ApiKeyStore>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            service,
            api_keys,
            rate_limiter,
        }
    }
}
