// ABOUTME: Request-body builders for the Optimizely experiment endpoints.
// ABOUTME: Owns the per-field defaults, traffic splits, and account-id injection.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ToolError;

/// Account id stamped into metrics and update payloads when the caller does
/// not supply one. Overridable through `OPTLY_ACCOUNT_ID`.
pub const DEFAULT_ACCOUNT_ID: u64 = 21_972_070_025;

pub const DEFAULT_STATUS: &str = "not_started";
pub const DEFAULT_TYPE: &str = "a/b";
pub const DEFAULT_AUDIENCE: &str = "everyone";

pub const DEFAULT_METRIC_AGGREGATOR: &str = "unique";
pub const DEFAULT_METRIC_SCOPE: &str = "visitor";
pub const DEFAULT_METRIC_EVENT_TYPE: &str = "custom";
pub const DEFAULT_METRIC_WINNING_DIRECTION: &str = "increasing";

/// Optimizely expresses traffic weights in basis points summing to 10 000.
pub const TOTAL_TRAFFIC_WEIGHT: i64 = 10_000;

pub const DEFAULT_VARIATION_NAMES: [&str; 2] = ["Control", "Treatment 1"];

/// One variation as supplied to `create_experiment`: a name plus an optional
/// traffic weight as a percentage (0-100).
#[derive(Debug, Clone, Deserialize)]
pub struct VariationSpec {
    pub name: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Inputs to the full-featured creation variant.
#[derive(Debug, Clone, Default)]
pub struct CreateExperiment {
    pub name: String,
    pub description: Option<String>,
    pub audience_conditions: Option<String>,
    pub status: Option<String>,
    pub experiment_type: Option<String>,
    pub variations: Option<Vec<VariationSpec>>,
    pub metrics: Option<Vec<Value>>,
}

/// Inputs to `update_experiment`. Only supplied fields are sent upstream.
#[derive(Debug, Clone, Default)]
pub struct UpdateExperiment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub audience_conditions: Option<String>,
    pub status: Option<String>,
    pub metrics: Option<Vec<Value>>,
}

/// Parse the `variations` parameter of `create_experiment` from its
/// serialized-JSON form.
pub fn parse_variations(field: &str, raw: &str) -> Result<Vec<VariationSpec>, ToolError> {
    serde_json::from_str(raw.trim()).map_err(|e| ToolError::InvalidParameter {
        field: field.to_string(),
        reason: format!("not a valid JSON array of variations ({e})"),
        value: raw.to_string(),
    })
}

/// Fill in the standard metric defaults for any field the caller left out.
/// Explicitly supplied values are never overwritten.
pub fn apply_metric_defaults(metric: &mut Value, account_id: u64) {
    let Some(obj) = metric.as_object_mut() else {
        return;
    };
    obj.entry("aggregator")
        .or_insert_with(|| json!(DEFAULT_METRIC_AGGREGATOR));
    obj.entry("scope")
        .or_insert_with(|| json!(DEFAULT_METRIC_SCOPE));
    obj.entry("event_type")
        .or_insert_with(|| json!(DEFAULT_METRIC_EVENT_TYPE));
    obj.entry("winning_direction")
        .or_insert_with(|| json!(DEFAULT_METRIC_WINNING_DIRECTION));
    obj.entry("account_id").or_insert_with(|| json!(account_id));
}

/// Split the total traffic weight equally across the given variation names,
/// assigning the integer-division remainder to the first variation.
pub fn equal_split(names: &[String]) -> Vec<Value> {
    let n = names.len() as i64;
    let base = TOTAL_TRAFFIC_WEIGHT / n;
    let remainder = TOTAL_TRAFFIC_WEIGHT % n;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let weight = if i == 0 { base + remainder } else { base };
            json!({ "name": name, "weight": weight, "archived": false, "status": "active" })
        })
        .collect()
}

/// The default 50/50 Control vs. first-treatment split.
pub fn default_variations() -> Vec<Value> {
    let names: Vec<String> = DEFAULT_VARIATION_NAMES.iter().map(|s| s.to_string()).collect();
    equal_split(&names)
}

/// Convert supplied variation specs to wire form. Percent weights become
/// basis points; if any spec omits its weight, traffic is split equally
/// across all supplied names instead.
pub fn variations_from_specs(specs: &[VariationSpec]) -> Vec<Value> {
    if specs.iter().all(|s| s.weight.is_some()) {
        specs
            .iter()
            .map(|s| {
                let weight = (s.weight.unwrap_or(0.0) * 100.0).round() as i64;
                json!({ "name": s.name, "weight": weight, "archived": false, "status": "active" })
            })
            .collect()
    } else {
        let names: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
        equal_split(&names)
    }
}

fn ensure_metric_object(value: &Value) -> Result<(), ToolError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ToolError::InvalidParameter {
            field: "metrics".to_string(),
            reason: "expected an array of metric objects".to_string(),
            value: value.to_string(),
        })
    }
}

/// Assemble the POST body for experiment creation.
pub fn build_create_body(
    project_id: i64,
    spec: &CreateExperiment,
    account_id: u64,
) -> Result<Value, ToolError> {
    let variations = match &spec.variations {
        Some(specs) if !specs.is_empty() => variations_from_specs(specs),
        _ => default_variations(),
    };

    let mut metrics = spec.metrics.clone().unwrap_or_default();
    for metric in &mut metrics {
        ensure_metric_object(metric)?;
        apply_metric_defaults(metric, account_id);
    }

    let mut body = json!({
        "project_id": project_id,
        "name": spec.name,
        "audience_conditions": spec.audience_conditions.as_deref().unwrap_or(DEFAULT_AUDIENCE),
        "status": spec.status.as_deref().unwrap_or(DEFAULT_STATUS),
        "type": spec.experiment_type.as_deref().unwrap_or(DEFAULT_TYPE),
        "variations": variations,
        "metrics": metrics,
    });
    if let Some(description) = &spec.description {
        body["description"] = json!(description);
    }
    Ok(body)
}

/// Assemble the POST body for the simplified A/B creation variant: named
/// variations with an equal basis-point split and metrics built from event
/// ids alone.
pub fn build_ab_test_body(
    project_id: i64,
    name: &str,
    description: Option<&str>,
    variation_names: &[String],
    event_ids: &[i64],
    account_id: u64,
) -> Value {
    let variations = if variation_names.is_empty() {
        default_variations()
    } else {
        equal_split(variation_names)
    };

    let mut metrics: Vec<Value> = event_ids.iter().map(|id| json!({ "event_id": id })).collect();
    for metric in &mut metrics {
        apply_metric_defaults(metric, account_id);
    }

    let mut body = json!({
        "project_id": project_id,
        "name": name,
        "audience_conditions": DEFAULT_AUDIENCE,
        "status": DEFAULT_STATUS,
        "type": DEFAULT_TYPE,
        "variations": variations,
        "metrics": metrics,
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    body
}

/// Assemble the PATCH body for an experiment update. The account id is
/// injected at the top level and into each metric when not already present.
pub fn build_update_body(spec: &UpdateExperiment, account_id: u64) -> Result<Value, ToolError> {
    let mut body = serde_json::Map::new();

    if let Some(name) = &spec.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(description) = &spec.description {
        body.insert("description".to_string(), json!(description));
    }
    if let Some(audience) = &spec.audience_conditions {
        body.insert("audience_conditions".to_string(), json!(audience));
    }
    if let Some(status) = &spec.status {
        body.insert("status".to_string(), json!(status));
    }
    if let Some(metrics) = &spec.metrics {
        let mut metrics = metrics.clone();
        for metric in &mut metrics {
            ensure_metric_object(metric)?;
            apply_metric_defaults(metric, account_id);
        }
        body.insert("metrics".to_string(), json!(metrics));
    }

    body.entry("account_id").or_insert_with(|| json!(account_id));
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_defaults_fill_only_absent_fields() {
        let mut metric = json!({ "event_id": 1 });
        apply_metric_defaults(&mut metric, DEFAULT_ACCOUNT_ID);

        assert_eq!(metric["aggregator"], "unique");
        assert_eq!(metric["scope"], "visitor");
        assert_eq!(metric["event_type"], "custom");
        assert_eq!(metric["winning_direction"], "increasing");
        assert_eq!(metric["account_id"], DEFAULT_ACCOUNT_ID);
        assert_eq!(metric["event_id"], 1);
    }

    #[test]
    fn metric_defaults_never_overwrite_explicit_values() {
        let mut metric = json!({ "event_id": 2, "aggregator": "sum", "account_id": 7 });
        apply_metric_defaults(&mut metric, DEFAULT_ACCOUNT_ID);

        assert_eq!(metric["aggregator"], "sum");
        assert_eq!(metric["account_id"], 7);
        assert_eq!(metric["scope"], "visitor");
    }

    #[test]
    fn update_body_applies_metric_defaults_and_account_id() {
        let metrics = crate::params::parse_json_array("metrics", r#"[{"event_id":1}]"#).unwrap();
        let spec = UpdateExperiment {
            metrics: Some(metrics),
            ..Default::default()
        };
        let body = build_update_body(&spec, DEFAULT_ACCOUNT_ID).unwrap();

        assert_eq!(body["account_id"], DEFAULT_ACCOUNT_ID);
        let metric = &body["metrics"][0];
        assert_eq!(metric["event_id"], 1);
        assert_eq!(metric["aggregator"], "unique");
        assert_eq!(metric["scope"], "visitor");
        assert_eq!(metric["event_type"], "custom");
        assert_eq!(metric["winning_direction"], "increasing");
        assert_eq!(metric["account_id"], DEFAULT_ACCOUNT_ID);
    }

    #[test]
    fn update_body_keeps_explicit_account_id() {
        let spec = UpdateExperiment {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let body = build_update_body(&spec, 42).unwrap();
        assert_eq!(body["account_id"], 42);
        assert_eq!(body["name"], "Renamed");
        assert!(body.get("metrics").is_none());
        assert!(body.get("description").is_none());
    }

    #[test]
    fn update_body_rejects_non_object_metrics() {
        let spec = UpdateExperiment {
            metrics: Some(vec![json!("event-1")]),
            ..Default::default()
        };
        let err = build_update_body(&spec, DEFAULT_ACCOUNT_ID).unwrap_err();
        assert!(err.to_string().contains("metrics"));
    }

    #[test]
    fn create_body_defaults_status_type_audience_and_split() {
        let spec = CreateExperiment {
            name: "Homepage CTA".to_string(),
            ..Default::default()
        };
        let body = build_create_body(3000, &spec, DEFAULT_ACCOUNT_ID).unwrap();

        assert_eq!(body["project_id"], 3000);
        assert_eq!(body["status"], "not_started");
        assert_eq!(body["type"], "a/b");
        assert_eq!(body["audience_conditions"], "everyone");
        assert!(body.get("description").is_none());

        let variations = body["variations"].as_array().unwrap();
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0]["name"], "Control");
        assert_eq!(variations[0]["weight"], 5000);
        assert_eq!(variations[1]["name"], "Treatment 1");
        assert_eq!(variations[1]["weight"], 5000);
    }

    #[test]
    fn create_body_converts_percent_weights_to_basis_points() {
        let variations = parse_variations(
            "variations",
            r#"[{"name":"A","weight":60},{"name":"B","weight":40}]"#,
        )
        .unwrap();
        let spec = CreateExperiment {
            name: "Weighted".to_string(),
            variations: Some(variations),
            ..Default::default()
        };
        let body = build_create_body(3000, &spec, DEFAULT_ACCOUNT_ID).unwrap();

        let variations = body["variations"].as_array().unwrap();
        assert_eq!(variations[0]["weight"], 6000);
        assert_eq!(variations[1]["weight"], 4000);
    }

    #[test]
    fn partial_weights_fall_back_to_an_equal_split() {
        let variations = parse_variations(
            "variations",
            r#"[{"name":"A","weight":60},{"name":"B"}]"#,
        )
        .unwrap();
        let spec = CreateExperiment {
            name: "Partial".to_string(),
            variations: Some(variations),
            ..Default::default()
        };
        let body = build_create_body(3000, &spec, DEFAULT_ACCOUNT_ID).unwrap();

        let variations = body["variations"].as_array().unwrap();
        assert_eq!(variations[0]["weight"], 5000);
        assert_eq!(variations[1]["weight"], 5000);
    }

    #[test]
    fn equal_split_assigns_remainder_to_the_first_variation() {
        let names: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let split = equal_split(&names);
        assert_eq!(split[0]["weight"], 3334);
        assert_eq!(split[1]["weight"], 3333);
        assert_eq!(split[2]["weight"], 3333);

        let total: i64 = split.iter().map(|v| v["weight"].as_i64().unwrap()).sum();
        assert_eq!(total, TOTAL_TRAFFIC_WEIGHT);
    }

    #[test]
    fn malformed_variations_json_is_descriptive() {
        let err = parse_variations("variations", r#"[{"name":}]"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("variations"));
        assert!(msg.contains("JSON array of variations"));
    }

    #[test]
    fn ab_test_body_builds_metrics_from_event_ids() {
        let names: Vec<String> = vec!["Control".to_string(), "Challenger".to_string()];
        let body = build_ab_test_body(3000, "Quick test", None, &names, &[101, 102], 42);

        assert_eq!(body["name"], "Quick test");
        assert_eq!(body["variations"][1]["name"], "Challenger");

        let metrics = body["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0]["event_id"], 101);
        assert_eq!(metrics[0]["aggregator"], "unique");
        assert_eq!(metrics[0]["account_id"], 42);
    }

    #[test]
    fn ab_test_body_defaults_variation_names_when_none_supplied() {
        let body = build_ab_test_body(3000, "Defaulted", Some("desc"), &[], &[], 42);
        assert_eq!(body["description"], "desc");
        let variations = body["variations"].as_array().unwrap();
        assert_eq!(variations[0]["name"], "Control");
        assert_eq!(variations[1]["name"], "Treatment 1");
    }
}
