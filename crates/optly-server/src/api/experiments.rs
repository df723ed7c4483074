// ABOUTME: Experiment tool handlers: the two creation variants and update.
// ABOUTME: Each validates, normalizes, authenticates, then makes one outbound call.

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde_json::{Value, json};

use optly_client::auth::{access_token, resolve_project_id};
use optly_core::experiment::{
    CreateExperiment, UpdateExperiment, build_ab_test_body, build_create_body, build_update_body,
    parse_variations,
};
use optly_core::{ToolError, params};

use crate::app_state::{AppState, SharedState};

use super::{ToolRequest, tool_failure, tool_success};

/// POST /tools/create_experiment
pub async fn create_experiment(
    State(state): State<SharedState>,
    Json(req): Json<ToolRequest>,
) -> Response {
    match run_create_experiment(&state, &req).await {
        Ok(value) => tool_success(value),
        Err(err) => tool_failure("create_experiment", err),
    }
}

async fn run_create_experiment(state: &AppState, req: &ToolRequest) -> Result<Value, ToolError> {
    let params = &req.parameters;
    let name = params::required_str(params, "name")?.to_string();

    let variations = match params::optional_str(params, "variations") {
        Some(raw) => Some(parse_variations("variations", raw)?),
        None => None,
    };
    let metrics = match params::optional_str(params, "metrics") {
        Some(raw) => Some(params::parse_json_array("metrics", raw)?),
        None => None,
    };

    let token = access_token(req.auth.as_ref())?;
    let explicit_project = params::id_field(params, "project_id")?;
    let project_id = resolve_project_id(explicit_project, req.auth.as_ref())?;

    let spec = CreateExperiment {
        name,
        description: params::optional_str(params, "description").map(String::from),
        audience_conditions: params::optional_str(params, "audience_conditions").map(String::from),
        status: params::optional_str(params, "status").map(String::from),
        experiment_type: params::optional_str(params, "type").map(String::from),
        variations,
        metrics,
    };
    let body = build_create_body(project_id, &spec, state.config.account_id)?;

    let experiment = state.optimizely.create_experiment(token, &body).await?;
    Ok(json!({ "success": true, "experiment": experiment }))
}

/// POST /tools/create_ab_test
pub async fn create_ab_test(
    State(state): State<SharedState>,
    Json(req): Json<ToolRequest>,
) -> Response {
    match run_create_ab_test(&state, &req).await {
        Ok(value) => tool_success(value),
        Err(err) => tool_failure("create_ab_test", err),
    }
}

async fn run_create_ab_test(state: &AppState, req: &ToolRequest) -> Result<Value, ToolError> {
    let params = &req.parameters;
    let name = params::required_str(params, "name")?;

    let variation_names = match params::optional_str(params, "variation_names") {
        Some(raw) => params::parse_string_list("variation_names", raw)?,
        None => Vec::new(),
    };
    let event_ids = match params::optional_str(params, "event_ids") {
        Some(raw) => params::parse_string_list("event_ids", raw)?
            .iter()
            .map(|id| params::parse_id("event_ids", id))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let token = access_token(req.auth.as_ref())?;
    let explicit_project = params::id_field(params, "project_id")?;
    let project_id = resolve_project_id(explicit_project, req.auth.as_ref())?;

    let body = build_ab_test_body(
        project_id,
        name,
        params::optional_str(params, "description"),
        &variation_names,
        &event_ids,
        state.config.account_id,
    );

    let experiment = state.optimizely.create_experiment(token, &body).await?;
    Ok(json!({ "success": true, "experiment": experiment }))
}

/// POST /tools/update_experiment
pub async fn update_experiment(
    State(state): State<SharedState>,
    Json(req): Json<ToolRequest>,
) -> Response {
    match run_update_experiment(&state, &req).await {
        Ok(value) => tool_success(value),
        Err(err) => tool_failure("update_experiment", err),
    }
}

async fn run_update_experiment(state: &AppState, req: &ToolRequest) -> Result<Value, ToolError> {
    let params = &req.parameters;
    let experiment_id = params::required_id(params, "experiment_id")?;

    let metrics = match params::optional_str(params, "metrics") {
        Some(raw) => Some(params::parse_json_array("metrics", raw)?),
        None => None,
    };

    let token = access_token(req.auth.as_ref())?;

    let spec = UpdateExperiment {
        name: params::optional_str(params, "name").map(String::from),
        description: params::optional_str(params, "description").map(String::from),
        audience_conditions: params::optional_str(params, "audience_conditions").map(String::from),
        status: params::optional_str(params, "status").map(String::from),
        metrics,
    };
    let body = build_update_body(&spec, state.config.account_id)?;

    let experiment = state
        .optimizely
        .update_experiment(token, experiment_id, &body)
        .await?;
    Ok(json!({ "success": true, "experiment": experiment }))
}
