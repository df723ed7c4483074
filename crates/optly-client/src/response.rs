// ABOUTME: Tagged representation of an upstream response body: JSON when the
// ABOUTME: content-type says so and the body parses, raw text otherwise.

use serde_json::Value;

use optly_core::ToolError;

/// What an upstream body turned out to be. The tag is decided by the
/// response's content-type, with a fallback to `Text` when a JSON-labeled
/// body fails to parse; the HTTP status is never used to guess the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    /// Drain a reqwest response into a tagged body.
    pub async fn read(service: &str, response: reqwest::Response) -> Result<Self, ToolError> {
        let json_content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|e| ToolError::Transport {
                service: service.to_string(),
                message: format!("failed to read response body: {e}"),
            })?;

        Ok(Self::from_parts(json_content_type, text))
    }

    /// Classify a body given whether the content-type indicated JSON.
    pub fn from_parts(json_content_type: bool, text: String) -> Self {
        if json_content_type {
            match serde_json::from_str(&text) {
                Ok(value) => ApiBody::Json(value),
                Err(_) => ApiBody::Text(text),
            }
        } else {
            ApiBody::Text(text)
        }
    }

    /// The body as a JSON value; text bodies become a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            ApiBody::Json(value) => value,
            ApiBody::Text(text) => Value::String(text),
        }
    }

    /// Stringified body for embedding into error messages.
    pub fn display(&self) -> String {
        match self {
            ApiBody::Json(value) => value.to_string(),
            ApiBody::Text(text) => text.clone(),
        }
    }
}
