// ABOUTME: HTTP client for the hosted report-generation function: posts the
// ABOUTME: recipient email plus report payload and parses the function's reply.

use serde::Deserialize;
use serde_json::json;

use optly_core::{ReportPayload, ToolError};

use crate::response::ApiBody;

pub const DEFAULT_FUNCTION_URL: &str =
    "https://faas-nyc1.doserverless.co/api/v1/web/fn-optly-reports/default/generate-report";

const SERVICE: &str = "report function";

/// What the report function returns on success.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report_id: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the report-generation function endpoint.
pub struct ReportClient {
    client: reqwest::Client,
    function_url: String,
}

impl ReportClient {
    pub fn new(function_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            function_url: function_url.into(),
        }
    }

    /// Submit a report for generation and delivery to `email`.
    pub async fn generate(
        &self,
        email: &str,
        payload: &ReportPayload,
    ) -> Result<ReportResponse, ToolError> {
        let body = json!({ "email": email, "reportData": payload });
        tracing::debug!(url = %self.function_url, "requesting report generation");

        let response = self
            .client
            .post(&self.function_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::Transport {
                service: SERVICE.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = ApiBody::read(SERVICE, response).await?;
        if !status.is_success() {
            return Err(ToolError::Upstream {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body: body.display(),
            });
        }

        let value = match body {
            ApiBody::Json(value) => value,
            ApiBody::Text(text) => {
                return Err(ToolError::UnexpectedResponse {
                    service: SERVICE.to_string(),
                    detail: format!("expected a JSON body, got: {text}"),
                });
            }
        };

        serde_json::from_value(value).map_err(|e| ToolError::UnexpectedResponse {
            service: SERVICE.to_string(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_response_deserializes_camel_case() {
        let value = json!({
            "reportId": "rpt-123",
            "pdfUrl": "https://cdn.example.com/rpt-123.pdf",
            "message": "Report emailed"
        });
        let response: ReportResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.report_id, "rpt-123");
        assert_eq!(
            response.pdf_url.as_deref(),
            Some("https://cdn.example.com/rpt-123.pdf")
        );
        assert_eq!(response.message.as_deref(), Some("Report emailed"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let response: ReportResponse =
            serde_json::from_value(json!({ "reportId": "rpt-9" })).unwrap();
        assert_eq!(response.report_id, "rpt-9");
        assert!(response.pdf_url.is_none());
        assert!(response.message.is_none());
    }
}
