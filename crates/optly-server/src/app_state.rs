// ABOUTME: Shared application state for the optly tool server.
// ABOUTME: Holds the outbound clients and config; no per-request state survives.

use std::sync::Arc;

use optly_client::{OptimizelyClient, ReportClient};

use crate::config::ToolsConfig;

/// Shared state accessible by all Axum handlers: the two outbound clients
/// and the loaded configuration. Invocations are independent, so nothing
/// here is mutable.
pub struct AppState {
    pub optimizely: OptimizelyClient,
    pub reports: ReportClient,
    pub config: ToolsConfig,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            optimizely: OptimizelyClient::new(config.optimizely_base_url.clone()),
            reports: ReportClient::new(config.report_function_url.clone()),
            config,
        }
    }
}
