// ABOUTME: The Experiment Report Payload types and the report-level defaults
// ABOUTME: (recommendation placeholder and follow-up actions).

use serde::Serialize;

pub const DEFAULT_RECOMMENDATION_STATUS: &str = "Pending review";
pub const DEFAULT_RECOMMENDATION_TITLE: &str = "Review experiment results";
pub const DEFAULT_RECOMMENDATION_DESCRIPTION: &str =
    "Review the results with your team before making a rollout decision.";

/// The three follow-up actions used when the caller supplies none.
pub fn default_actions() -> Vec<String> {
    vec![
        "Share the report with stakeholders".to_string(),
        "Document learnings from this experiment".to_string(),
        "Plan a follow-up experiment".to_string(),
    ]
}

/// The normalized report schema sent to the report-generation function.
/// Serialized camelCase; every field is derived fresh per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub experiment_id: String,
    pub date_range: String,
    pub duration: String,
    pub sample_size: u64,
    pub confidence_level: f64,
    pub metrics: Vec<MetricSummary>,
    pub variations: Vec<VariationSummary>,
    pub recommendation: Recommendation,
    pub actions: Vec<String>,
}

/// One metric with its headline lift and per-variation breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub lift: String,
    pub variations: Vec<MetricVariation>,
}

/// A variation's observed value and significance for one metric, both as
/// percentages.
#[derive(Debug, Clone, Serialize)]
pub struct MetricVariation {
    pub name: String,
    pub value: f64,
    pub significance: f64,
}

/// Exposure summary for one variation arm.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSummary {
    pub name: String,
    pub sample_size: u64,
    pub description: String,
}

/// Next-step recommendation block. Each field defaults independently.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub status: String,
    pub title: String,
    pub description: String,
}

impl Default for Recommendation {
    fn default() -> Self {
        Self {
            status: DEFAULT_RECOMMENDATION_STATUS.to_string(),
            title: DEFAULT_RECOMMENDATION_TITLE.to_string(),
            description: DEFAULT_RECOMMENDATION_DESCRIPTION.to_string(),
        }
    }
}
