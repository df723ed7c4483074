// ABOUTME: Tool discovery metadata, expressed as serde_json::Value schemas.
// ABOUTME: Served verbatim from /discovery; carries no runtime logic of its own.

use serde_json::{Value, json};

/// Return the complete set of tool definitions exposed by this service.
/// Each entry carries the tool name, a description, a JSON-schema parameter
/// block, and whether a vendor access token is required.
pub fn all_tool_definitions() -> Vec<Value> {
    vec![
        create_experiment(),
        create_ab_test(),
        update_experiment(),
        list_events(),
        generate_report(),
    ]
}

/// Tool: create an experiment with explicit variations and metrics.
fn create_experiment() -> Value {
    json!({
        "name": "create_experiment",
        "description": "Create an Optimizely experiment. Defaults: status not_started, type a/b, audience everyone, and a 50/50 Control/Treatment 1 traffic split.",
        "requires_auth": true,
        "parameters": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Experiment name."
                },
                "project_id": {
                    "type": "string",
                    "description": "Optimizely project id. Falls back to the project id in the auth context when omitted."
                },
                "description": {
                    "type": "string",
                    "description": "Optional experiment description."
                },
                "audience_conditions": {
                    "type": "string",
                    "description": "Audience conditions expression. Defaults to \"everyone\"."
                },
                "status": {
                    "type": "string",
                    "description": "Initial status. Defaults to \"not_started\"."
                },
                "type": {
                    "type": "string",
                    "description": "Experiment type. Defaults to \"a/b\"."
                },
                "variations": {
                    "type": "string",
                    "description": "JSON array of {name, weight} objects, weight as a percentage (0-100). Defaults to a 50/50 Control/Treatment 1 split."
                },
                "metrics": {
                    "type": "string",
                    "description": "JSON array of metric objects. Missing metric fields get the standard defaults."
                }
            },
            "required": ["name"]
        }
    })
}

/// Tool: simplified A/B creation variant (names + event ids only).
fn create_ab_test() -> Value {
    json!({
        "name": "create_ab_test",
        "description": "Create a simple A/B test from variation names and event ids. Traffic is split equally across variations.",
        "requires_auth": true,
        "parameters": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Experiment name."
                },
                "project_id": {
                    "type": "string",
                    "description": "Optimizely project id. Falls back to the project id in the auth context when omitted."
                },
                "description": {
                    "type": "string",
                    "description": "Optional experiment description."
                },
                "variation_names": {
                    "type": "string",
                    "description": "JSON array or comma-separated list of variation names. Defaults to Control and Treatment 1."
                },
                "event_ids": {
                    "type": "string",
                    "description": "JSON array or comma-separated list of numeric event ids; each becomes a metric with the standard defaults."
                }
            },
            "required": ["name"]
        }
    })
}

/// Tool: patch an existing experiment.
fn update_experiment() -> Value {
    json!({
        "name": "update_experiment",
        "description": "Update an existing Optimizely experiment. Supplied metrics get the standard defaults and the configured account id.",
        "requires_auth": true,
        "parameters": {
            "type": "object",
            "properties": {
                "experiment_id": {
                    "type": "string",
                    "description": "Numeric experiment id."
                },
                "name": {
                    "type": "string",
                    "description": "New experiment name."
                },
                "description": {
                    "type": "string",
                    "description": "New experiment description."
                },
                "audience_conditions": {
                    "type": "string",
                    "description": "New audience conditions expression."
                },
                "status": {
                    "type": "string",
                    "description": "New experiment status."
                },
                "metrics": {
                    "type": "string",
                    "description": "JSON array of metric objects to replace the experiment's metrics."
                }
            },
            "required": ["experiment_id"]
        }
    })
}

/// Tool: list events for a project.
fn list_events() -> Value {
    json!({
        "name": "list_events",
        "description": "List events for an Optimizely project.",
        "requires_auth": true,
        "parameters": {
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Optimizely project id. Falls back to the project id in the auth context when omitted."
                },
                "per_page": {
                    "type": "string",
                    "description": "Page size for the listing. Defaults to 100."
                }
            },
            "required": []
        }
    })
}

/// Tool: transform a stats payload and generate an emailed PDF report.
fn generate_report() -> Value {
    json!({
        "name": "generate_report",
        "description": "Transform Optimizely experiment results into a normalized report and email it as a PDF.",
        "requires_auth": false,
        "parameters": {
            "type": "object",
            "properties": {
                "results": {
                    "type": "string",
                    "description": "Optimizely Stats API results payload as a JSON string."
                },
                "email": {
                    "type": "string",
                    "description": "Recipient email address for the generated report."
                },
                "recommendation_status": {
                    "type": "string",
                    "description": "Recommendation status line. Defaults to a placeholder when omitted."
                },
                "recommendation_title": {
                    "type": "string",
                    "description": "Recommendation title. Defaults when omitted."
                },
                "recommendation_description": {
                    "type": "string",
                    "description": "Recommendation body. Defaults when omitted."
                },
                "actions": {
                    "type": "string",
                    "description": "JSON array or comma-separated list of follow-up actions. Defaults to three standard follow-ups."
                }
            },
            "required": ["results", "email"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_all_five_tools() {
        let tools = all_tool_definitions();
        let names: Vec<&str> = tools
            .iter()
            .map(|t| t.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "create_experiment",
                "create_ab_test",
                "update_experiment",
                "list_events",
                "generate_report"
            ]
        );
    }

    #[test]
    fn every_tool_has_schema_and_auth_flag() {
        for tool in all_tool_definitions() {
            assert!(tool.get("description").is_some());
            assert!(tool.get("requires_auth").is_some());
            let params = tool.get("parameters").unwrap();
            assert_eq!(params["type"], "object");
            assert!(params.get("properties").is_some());
            assert!(params.get("required").is_some());
        }
    }

    #[test]
    fn only_the_report_tool_skips_vendor_auth() {
        for tool in all_tool_definitions() {
            let name = tool["name"].as_str().unwrap();
            let requires_auth = tool["requires_auth"].as_bool().unwrap();
            assert_eq!(requires_auth, name != "generate_report", "{name}");
        }
    }
}
