// ABOUTME: Transformation of a raw Optimizely Stats results payload into the
// ABOUTME: normalized Experiment Report Payload, failing fast on missing fields.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::error::ToolError;
use crate::report::{
    MetricSummary, MetricVariation, Recommendation, ReportPayload, VariationSummary,
};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub const CONTROL_DESCRIPTION: &str = "Original experience (Control)";
pub const TREATMENT_DESCRIPTION: &str = "Treatment variation";

/// Build the full report payload from a raw results object plus the
/// (already-defaulted) recommendation and actions.
///
/// Required fields: `start_time`, `end_time`, `experiment_id`, `metrics`,
/// `reach.variations`, `reach.total_count`, `stats_config.confidence_level`.
/// Any absent or malformed field fails with an error naming its path.
pub fn build_report_payload(
    results: &Value,
    recommendation: Recommendation,
    actions: Vec<String>,
) -> Result<ReportPayload, ToolError> {
    let start = timestamp_field(results, "start_time")?;
    let end = timestamp_field(results, "end_time")?;
    if end < start {
        return Err(ToolError::InvalidResults(
            "end_time precedes start_time".to_string(),
        ));
    }

    // `i64::div_ceil` is still unstable (int_roundings); numerator is
    // non-negative here (end >= start checked above), so the standard
    // ceil-division identity is exactly equivalent.
    let duration_days =
        (end.timestamp_millis() - start.timestamp_millis() + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    let date_range = format!("{} - {}", format_day(&start), format_day(&end));

    let experiment_id = match lookup(results, "experiment_id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(ToolError::InvalidResults(format!(
                "experiment_id must be a string or number, got: {other}"
            )));
        }
    };

    let metrics = lookup(results, "metrics")?
        .as_array()
        .ok_or_else(|| ToolError::InvalidResults("metrics must be an array".to_string()))?
        .iter()
        .map(transform_metric)
        .collect::<Result<Vec<_>, _>>()?;

    let variations = lookup(results, "reach.variations")?
        .as_object()
        .ok_or_else(|| ToolError::InvalidResults("reach.variations must be an object".to_string()))?
        .values()
        .map(transform_reach_variation)
        .collect::<Result<Vec<_>, _>>()?;

    let sample_size = lookup(results, "reach.total_count")?
        .as_u64()
        .ok_or_else(|| {
            ToolError::InvalidResults("reach.total_count must be a non-negative integer".to_string())
        })?;

    let confidence_level = lookup(results, "stats_config.confidence_level")?
        .as_f64()
        .ok_or_else(|| {
            ToolError::InvalidResults("stats_config.confidence_level must be a number".to_string())
        })?;

    Ok(ReportPayload {
        experiment_id,
        date_range,
        duration: format!("{duration_days} days"),
        sample_size,
        confidence_level: confidence_level * 100.0,
        metrics,
        variations,
        recommendation,
        actions,
    })
}

/// Format the headline lift for a metric: the maximum lift fraction across
/// variations, rendered as `+X.X%` when positive, `N/A` otherwise.
pub fn format_lift(best: Option<f64>) -> String {
    match best {
        Some(v) if v > 0.0 => format!("+{:.1}%", v * 100.0),
        _ => "N/A".to_string(),
    }
}

/// Walk a dotted field path, treating absent keys and explicit nulls the
/// same way: a missing-field error carrying the full path.
fn lookup<'a>(results: &'a Value, path: &str) -> Result<&'a Value, ToolError> {
    let mut current = results;
    for segment in path.split('.') {
        current = current
            .get(segment)
            .ok_or_else(|| ToolError::MissingResultsField(path.to_string()))?;
    }
    if current.is_null() {
        return Err(ToolError::MissingResultsField(path.to_string()));
    }
    Ok(current)
}

/// Parse a timestamp field as either an RFC 3339 string or an
/// epoch-millisecond number.
fn timestamp_field(results: &Value, field: &str) -> Result<DateTime<FixedOffset>, ToolError> {
    match lookup(results, field)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s).map_err(|e| {
            ToolError::InvalidResults(format!("`{field}` is not a valid RFC 3339 timestamp: {e}"))
        }),
        Value::Number(n) => {
            let millis = n.as_i64().ok_or_else(|| {
                ToolError::InvalidResults(format!("`{field}` is not a valid millisecond timestamp"))
            })?;
            DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.fixed_offset())
                .ok_or_else(|| {
                    ToolError::InvalidResults(format!(
                        "`{field}` is out of range for a millisecond timestamp"
                    ))
                })
        }
        other => Err(ToolError::InvalidResults(format!(
            "`{field}` must be a timestamp string or number, got: {other}"
        ))),
    }
}

fn format_day(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

fn transform_metric(metric: &Value) -> Result<MetricSummary, ToolError> {
    let name = metric
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingResultsField("metrics[].name".to_string()))?
        .to_string();

    let results = metric
        .get("results")
        .and_then(Value::as_object)
        .ok_or_else(|| ToolError::MissingResultsField("metrics[].results".to_string()))?;

    let mut variations = Vec::new();
    let mut best_lift: Option<f64> = None;

    for result in results.values() {
        let variation_name = result
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::MissingResultsField("metrics[].results.name".to_string()))?;
        let rate = result
            .get("rate")
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolError::MissingResultsField("metrics[].results.rate".to_string()))?;

        let mut significance = 0.0;
        if let Some(lift) = result.get("lift").filter(|l| !l.is_null()) {
            significance = lift
                .get("significance")
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
                * 100.0;
            if let Some(value) = lift.get("value").and_then(Value::as_f64) {
                best_lift = Some(best_lift.map_or(value, |b| b.max(value)));
            }
        }

        variations.push(MetricVariation {
            name: variation_name.to_string(),
            value: rate * 100.0,
            significance,
        });
    }

    Ok(MetricSummary {
        name,
        lift: format_lift(best_lift),
        variations,
    })
}

fn transform_reach_variation(variation: &Value) -> Result<VariationSummary, ToolError> {
    let name = variation
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingResultsField("reach.variations.name".to_string()))?
        .to_string();
    let count = variation
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| ToolError::MissingResultsField("reach.variations.count".to_string()))?;
    let is_baseline = variation
        .get("is_baseline")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(VariationSummary {
        name,
        sample_size: count,
        description: if is_baseline {
            CONTROL_DESCRIPTION.to_string()
        } else {
            TREATMENT_DESCRIPTION.to_string()
        },
    })
}
