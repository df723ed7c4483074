// ABOUTME: API module containing the tool handlers and their shared plumbing:
// ABOUTME: the request envelope, error-to-response mapping, and success helper.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use optly_client::AuthPayload;
use optly_core::ToolError;

pub mod events;
pub mod experiments;
pub mod reports;

/// The invocation envelope every tool endpoint accepts: the tool's named
/// parameters plus the auth payload injected by the platform.
#[derive(Debug, Default, Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub auth: Option<AuthPayload>,
}

/// Convert a tool failure into an HTTP response. The message carries a
/// tool-name prefix so callers can attribute the error without extra context.
pub(crate) fn tool_failure(tool: &str, err: ToolError) -> Response {
    let status = match &err {
        ToolError::MissingAccessToken => StatusCode::UNAUTHORIZED,
        ToolError::Upstream { .. }
        | ToolError::Transport { .. }
        | ToolError::UnexpectedResponse { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!(tool, error = %err, "tool invocation failed");
    (
        status,
        Json(json!({ "success": false, "error": format!("{tool} failed: {err}") })),
    )
        .into_response()
}

pub(crate) fn tool_success(value: Value) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_missing_fields() {
        let req: ToolRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.auth.is_none());
        assert!(req.parameters.is_null());

        let req: ToolRequest = serde_json::from_value(json!({
            "parameters": { "name": "x" },
            "auth": { "credentials": { "access_token": "t" } }
        }))
        .unwrap();
        assert_eq!(req.parameters["name"], "x");
        assert!(req.auth.is_some());
    }

    #[test]
    fn failure_statuses_follow_the_taxonomy() {
        let resp = tool_failure("t", ToolError::MissingAccessToken);
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = tool_failure("t", ToolError::MissingParameter("name".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = tool_failure(
            "t",
            ToolError::Upstream {
                service: "s".to_string(),
                status: 500,
                status_text: "Internal Server Error".to_string(),
                body: "{}".to_string(),
            },
        );
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = tool_failure(
            "t",
            ToolError::Transport {
                service: "s".to_string(),
                message: "connection reset".to_string(),
            },
        );
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
