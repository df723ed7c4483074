// ABOUTME: Parameter extraction and conversion helpers shared by all tool handlers.
// ABOUTME: One place for the JSON-array-or-CSV parser and string-to-integer id parsing.

use serde_json::Value;

use crate::error::ToolError;

/// Extract a required, non-empty string parameter.
pub fn required_str<'a>(params: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    match params.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(ToolError::MissingParameter(field.to_string()))
        }
        Some(other) => Err(ToolError::InvalidParameter {
            field: field.to_string(),
            reason: "expected a string".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Extract an optional string parameter. Empty and whitespace-only values
/// count as absent.
pub fn optional_str<'a>(params: &'a Value, field: &str) -> Option<&'a str> {
    params
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse a string into an integer id, rejecting anything that is not a
/// plain integer with an error that includes the parser's complaint and
/// the raw value.
pub fn parse_id(field: &str, raw: &str) -> Result<i64, ToolError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ToolError::InvalidParameter {
            field: field.to_string(),
            reason: format!("not a valid integer id ({e})"),
            value: raw.to_string(),
        })
}

/// Extract an optional id parameter that may arrive as a JSON number or a
/// numeric string. Returns `Ok(None)` when absent or empty.
pub fn id_field(params: &Value, field: &str) -> Result<Option<i64>, ToolError> {
    match params.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| ToolError::InvalidParameter {
            field: field.to_string(),
            reason: "not an integral number".to_string(),
            value: n.to_string(),
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_id(field, s).map(Some),
        Some(other) => Err(ToolError::InvalidParameter {
            field: field.to_string(),
            reason: "expected a number or numeric string".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Extract a required id parameter (number or numeric string).
pub fn required_id(params: &Value, field: &str) -> Result<i64, ToolError> {
    id_field(params, field)?.ok_or_else(|| ToolError::MissingParameter(field.to_string()))
}

/// Parse a parameter documented as "JSON array or comma-separated string".
///
/// Input starting with `[` must parse as a JSON string array; a malformed
/// JSON array is a hard error, never silently comma-split. Anything else is
/// split on commas with each segment trimmed and empties dropped.
pub fn parse_string_list(field: &str, raw: &str) -> Result<Vec<String>, ToolError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| ToolError::InvalidParameter {
            field: field.to_string(),
            reason: format!("not a valid JSON string array ({e})"),
            value: raw.to_string(),
        })
    } else {
        Ok(trimmed
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Parse a parameter documented as a JSON array of objects (e.g. `metrics`),
/// supplied as a serialized string.
pub fn parse_json_array(field: &str, raw: &str) -> Result<Vec<Value>, ToolError> {
    let parsed: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ToolError::InvalidParameter {
            field: field.to_string(),
            reason: format!("not valid JSON ({e})"),
            value: raw.to_string(),
        })?;
    match parsed {
        Value::Array(items) => Ok(items),
        other => Err(ToolError::InvalidParameter {
            field: field.to_string(),
            reason: "expected a JSON array".to_string(),
            value: other.to_string(),
        }),
    }
}
