// ABOUTME: Auth payload types plus normalization of the vendor auth context:
// ABOUTME: access-token extraction and the project-id fallback chain.

use serde::Deserialize;
use serde_json::Value;

use optly_core::ToolError;

/// Authentication material injected alongside tool parameters:
/// credentials for the vendor API and an opaque context object whose
/// key spellings vary by provider version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Extract the bearer token from the auth payload. A missing or empty token
/// is fatal and must be reported before any outbound call is attempted.
pub fn access_token(auth: Option<&AuthPayload>) -> Result<&str, ToolError> {
    auth.and_then(|a| a.credentials.as_ref())
        .and_then(|c| c.access_token.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ToolError::MissingAccessToken)
}

/// Resolve the project id to operate on. Resolution order: explicit
/// parameter, then `project_id`, `projectId`, and `project.id` in the auth
/// context. First usable value wins; exhausting all sources is an error.
pub fn resolve_project_id(
    explicit: Option<i64>,
    auth: Option<&AuthPayload>,
) -> Result<i64, ToolError> {
    if let Some(id) = explicit {
        return Ok(id);
    }

    if let Some(ctx) = auth.and_then(|a| a.context.as_ref()) {
        let candidates = [
            ctx.get("project_id"),
            ctx.get("projectId"),
            ctx.get("project").and_then(|p| p.get("id")),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(id) = value_as_id(candidate) {
                return Ok(id);
            }
        }
    }

    Err(ToolError::MissingProjectId)
}

fn value_as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
