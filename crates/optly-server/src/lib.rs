// ABOUTME: HTTP surface for the optly tool service: tool routes, discovery
// ABOUTME: manifest, shared state, env configuration, and inbound bearer auth.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod manifest;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ToolsConfig};
pub use routes::create_router;
