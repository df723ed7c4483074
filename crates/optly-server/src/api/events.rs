// ABOUTME: The list_events tool handler: resolves the project id, issues one
// ABOUTME: GET to the events endpoint, and returns the events with a count.

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde_json::{Value, json};

use optly_client::auth::{access_token, resolve_project_id};
use optly_core::{ToolError, params};

use crate::app_state::{AppState, SharedState};

use super::{ToolRequest, tool_failure, tool_success};

const DEFAULT_PER_PAGE: u32 = 100;

/// POST /tools/list_events
pub async fn list_events(
    State(state): State<SharedState>,
    Json(req): Json<ToolRequest>,
) -> Response {
    match run_list_events(&state, &req).await {
        Ok(value) => tool_success(value),
        Err(err) => tool_failure("list_events", err),
    }
}

async fn run_list_events(state: &AppState, req: &ToolRequest) -> Result<Value, ToolError> {
    let params = &req.parameters;

    let per_page = match params::id_field(params, "per_page")? {
        Some(n) if n > 0 && n <= u32::MAX as i64 => n as u32,
        Some(n) => {
            return Err(ToolError::InvalidParameter {
                field: "per_page".to_string(),
                reason: "must be a positive integer".to_string(),
                value: n.to_string(),
            });
        }
        None => DEFAULT_PER_PAGE,
    };

    let token = access_token(req.auth.as_ref())?;
    let explicit_project = params::id_field(params, "project_id")?;
    let project_id = resolve_project_id(explicit_project, req.auth.as_ref())?;

    let events = state
        .optimizely
        .list_events(token, project_id, per_page)
        .await?;

    let count = events.as_array().map(|a| a.len()).unwrap_or(0);
    let events = if events.is_array() { events } else { json!([]) };

    Ok(json!({ "success": true, "events": events, "count": count }))
}
