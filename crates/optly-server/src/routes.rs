// ABOUTME: Route definitions for the optly tool service HTTP API.
// ABOUTME: Assembles tool, health, and discovery routes into a single Axum Router.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::AuthLayer;
use crate::manifest;

/// Build the complete Axum router with all routes and shared state.
/// When `auth_token` is set, /tools/* routes require a matching bearer token.
pub fn create_router(state: SharedState, auth_token: Option<String>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/discovery", get(discovery))
        .route("/tools/create_experiment", post(api::experiments::create_experiment))
        .route("/tools/create_ab_test", post(api::experiments::create_ab_test))
        .route("/tools/update_experiment", post(api::experiments::update_experiment))
        .route("/tools/list_events", post(api::events::list_events))
        .route("/tools/generate_report", post(api::reports::generate_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match auth_token {
        Some(token) => router.layer(AuthLayer::new(token)),
        None => router,
    }
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Tool discovery handler. Returns the manifest of exposed tools.
async fn discovery() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "functions": manifest::all_tool_definitions() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::config::ToolsConfig;
    use axum::body::Body;
    use http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        Arc::new(AppState::new(ToolsConfig::default()))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = create_router(test_state(), None);
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn discovery_lists_the_tool_manifest() {
        let app = create_router(test_state(), None);
        let resp = app
            .oneshot(Request::get("/discovery").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let functions = json["functions"].as_array().unwrap();
        assert_eq!(functions.len(), 5);
    }

    #[tokio::test]
    async fn configured_token_guards_tool_routes_but_not_discovery() {
        let app = create_router(test_state(), Some("secret".to_string()));
        let resp = app
            .oneshot(
                Request::post("/tools/list_events")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        let app = create_router(test_state(), Some("secret".to_string()));
        let resp = app
            .oneshot(Request::get("/discovery").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}
