// ABOUTME: The single error taxonomy shared by every tool: validation, auth,
// ABOUTME: identity resolution, upstream HTTP, and transport failures.

use thiserror::Error;

/// Everything that can go wrong inside a tool invocation. Each variant
/// carries enough context to diagnose the failure without retrying; none
/// are recovered from silently.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid value for `{field}`: {reason} (got: {value})")]
    InvalidParameter {
        field: String,
        reason: String,
        value: String,
    },

    #[error("no Optimizely access token available in the auth context")]
    MissingAccessToken,

    #[error("no project id available: pass `project_id` or connect an account that provides one")]
    MissingProjectId,

    #[error("results payload missing required field: {0}")]
    MissingResultsField(String),

    #[error("invalid results payload: {0}")]
    InvalidResults(String),

    #[error("{service} returned {status} {status_text}: {body}")]
    Upstream {
        service: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("{service} returned an unexpected response: {detail}")]
    UnexpectedResponse { service: String, detail: String },

    #[error("request to {service} failed: {message}")]
    Transport { service: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_field() {
        let err = ToolError::MissingParameter("name".to_string());
        assert_eq!(err.to_string(), "missing required parameter: name");

        let err = ToolError::InvalidParameter {
            field: "experiment_id".to_string(),
            reason: "not a valid integer id".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("experiment_id"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn upstream_error_embeds_status_and_body() {
        let err = ToolError::Upstream {
            service: "Optimizely API".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
            body: "{\"message\":\"no such experiment\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Not Found"));
        assert!(msg.contains("no such experiment"));
    }
}
