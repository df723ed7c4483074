// ABOUTME: The generate_report tool handler: parses the results payload,
// ABOUTME: applies recommendation/action defaults, and calls the report function.

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde_json::{Value, json};

use optly_core::report::{
    DEFAULT_RECOMMENDATION_DESCRIPTION, DEFAULT_RECOMMENDATION_STATUS,
    DEFAULT_RECOMMENDATION_TITLE, default_actions,
};
use optly_core::results::build_report_payload;
use optly_core::{Recommendation, ToolError, params};

use crate::app_state::{AppState, SharedState};

use super::{ToolRequest, tool_failure, tool_success};

/// POST /tools/generate_report
pub async fn generate_report(
    State(state): State<SharedState>,
    Json(req): Json<ToolRequest>,
) -> Response {
    match run_generate_report(&state, &req).await {
        Ok(value) => tool_success(value),
        Err(err) => tool_failure("generate_report", err),
    }
}

async fn run_generate_report(state: &AppState, req: &ToolRequest) -> Result<Value, ToolError> {
    let params = &req.parameters;
    let results_raw = params::required_str(params, "results")?;
    let email = params::required_str(params, "email")?;

    let results: Value =
        serde_json::from_str(results_raw).map_err(|e| ToolError::InvalidParameter {
            field: "results".to_string(),
            reason: format!("not valid JSON ({e})"),
            value: results_raw.to_string(),
        })?;

    // Each recommendation field defaults independently.
    let recommendation = Recommendation {
        status: params::optional_str(params, "recommendation_status")
            .unwrap_or(DEFAULT_RECOMMENDATION_STATUS)
            .to_string(),
        title: params::optional_str(params, "recommendation_title")
            .unwrap_or(DEFAULT_RECOMMENDATION_TITLE)
            .to_string(),
        description: params::optional_str(params, "recommendation_description")
            .unwrap_or(DEFAULT_RECOMMENDATION_DESCRIPTION)
            .to_string(),
    };
    let actions = match params::optional_str(params, "actions") {
        Some(raw) => params::parse_string_list("actions", raw)?,
        None => default_actions(),
    };

    let payload = build_report_payload(&results, recommendation, actions)?;

    let report = state.reports.generate(email, &payload).await?;
    let report_page_url = format!(
        "{}/{}",
        state.config.report_page_url.trim_end_matches('/'),
        report.report_id
    );

    Ok(json!({
        "success": true,
        "reportId": report.report_id,
        "pdfUrl": report.pdf_url,
        "reportPageUrl": report_page_url,
        "message": report.message,
    }))
}

#[cfg(test)]
mod tests {
    use crate::app_state::{AppState, SharedState};
    use crate::config::ToolsConfig;
    use crate::routes::create_router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        Arc::new(AppState::new(ToolsConfig::default()))
    }

    async fn post_tool(body: serde_json::Value) -> axum::response::Response {
        let app = create_router(test_state(), None);
        app.oneshot(
            Request::post("/tools/generate_report")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn results_parameter_is_required() {
        let resp = post_tool(serde_json::json!({
            "parameters": { "email": "team@example.com" }
        }))
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("generate_report failed:"), "{error}");
        assert!(error.contains("missing required parameter: results"), "{error}");
    }

    #[tokio::test]
    async fn email_parameter_is_required() {
        let resp = post_tool(serde_json::json!({
            "parameters": { "results": "{}" }
        }))
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("missing required parameter: email"),
            "{json}"
        );
    }

    #[tokio::test]
    async fn malformed_results_json_is_descriptive() {
        let resp = post_tool(serde_json::json!({
            "parameters": { "results": "{not json", "email": "team@example.com" }
        }))
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("results"), "{error}");
        assert!(error.contains("not valid JSON"), "{error}");
    }

    #[tokio::test]
    async fn incomplete_results_fail_naming_the_field() {
        let resp = post_tool(serde_json::json!({
            "parameters": {
                "results": "{\"start_time\": \"2026-03-01T00:00:00Z\"}",
                "email": "team@example.com"
            }
        }))
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(
            json["error"].as_str().unwrap().contains("end_time"),
            "{json}"
        );
    }

    #[tokio::test]
    async fn malformed_actions_list_is_rejected() {
        let resp = post_tool(serde_json::json!({
            "parameters": {
                "results": "{}",
                "email": "team@example.com",
                "actions": "[\"A\", B]"
            }
        }))
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(
            json["error"].as_str().unwrap().contains("actions"),
            "{json}"
        );
    }
}
