//! Tolerant field-extraction helpers over `serde_json::Value`.
//!
//! Raw provider payloads are opaque maps; these helpers keep handler bodies
//! terse by treating "missing" and "wrong type" identically, rather than
//! forcing every call site to match on `Value` variants by hand.

use chrono::{SecondsFormat, Utc};
use neuron_sse_types::{StreamScope, WorkflowContext};
use serde_json::Value;

/// Reads a string field from a JSON object, tolerating absence or a
/// non-string value.
pub fn as_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Reads an integer field from a JSON object, tolerating absence, a
/// non-integer value, or a float with a fractional part.
pub fn as_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

/// Reads a `u32` field, tolerating the same failure modes as [`as_i64`] plus
/// negative values.
pub fn as_u32(value: &Value, key: &str) -> Option<u32> {
    as_i64(value, key).and_then(|n| u32::try_from(n).ok())
}

/// Reads a boolean field, tolerating absence or a non-boolean value.
pub fn as_bool(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

/// Reads an object-valued field, tolerating absence or a non-object value.
pub fn as_object<'a>(value: &'a Value, key: &str) -> Option<&'a serde_json::Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}

/// Reads an array-valued field, tolerating absence or a non-array value.
pub fn as_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array)
}

/// Coerces any JSON scalar to its string form; objects/arrays return `None`.
pub fn coerce_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a string as JSON, returning `None` on any failure rather than an error.
pub fn safe_json_parse(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// The current UTC instant formatted as RFC-3339 with a literal `Z` suffix.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Recursively collects every string found under a `"url"` key, anywhere in
/// the value tree, up to `limit` entries. Used to pull source links out of a
/// web-search tool's raw output without modeling its exact shape.
pub fn extract_urls(value: &Value, limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    extract_urls_into(value, limit, &mut out);
    out
}

fn extract_urls_into(value: &Value, limit: usize, out: &mut Vec<String>) {
    if out.len() >= limit {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if out.len() >= limit {
                    return;
                }
                if key == "url" {
                    if let Value::String(s) = v {
                        out.push(s.clone());
                        continue;
                    }
                }
                extract_urls_into(v, limit, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                if out.len() >= limit {
                    return;
                }
                extract_urls_into(v, limit, out);
            }
        }
        _ => {}
    }
}

/// Builds a [`WorkflowContext`] from a caller-supplied metadata map, if the
/// required fields are present.
pub fn workflow_context_from_meta(meta: &Value) -> Option<WorkflowContext> {
    let workflow_key = as_str(meta, "workflow_key")?.to_string();
    let workflow_run_id = as_str(meta, "workflow_run_id")?.to_string();
    Some(WorkflowContext {
        workflow_key,
        workflow_run_id,
        stage_name: as_str(meta, "stage_name").map(str::to_string),
        step_name: as_str(meta, "step_name").map(str::to_string),
        step_agent: as_str(meta, "step_agent").map(str::to_string),
        parallel_group: as_str(meta, "parallel_group").map(str::to_string),
        branch_index: as_i64(meta, "branch_index"),
    })
}

/// Builds a [`StreamScope`] from a caller-supplied scope map, if it names an
/// `agent_tool` scope with a non-empty `tool_call_id`.
pub fn stream_scope_from_raw(scope: &Value) -> Option<StreamScope> {
    if as_str(scope, "type")? != "agent_tool" {
        return None;
    }
    let tool_call_id = as_str(scope, "tool_call_id")?;
    if tool_call_id.is_empty() {
        return None;
    }
    Some(StreamScope {
        scope_type: "agent_tool".to_string(),
        tool_call_id: tool_call_id.to_string(),
        tool_name: as_str(scope, "tool_name").map(str::to_string),
        agent: as_str(scope, "agent").map(str::to_string),
    })
}

/// Reads the set of function-tool names that should be treated as
/// agent-upgraded, from run metadata (`metadata.agent_tool_names`).
pub fn agent_tool_names_from_meta(meta: &Value) -> Vec<String> {
    as_array(meta, "agent_tool_names")
        .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Reads the function-tool-name -> agent-name map from run metadata
/// (`metadata.agent_tool_name_map`).
pub fn agent_tool_name_map_from_meta(meta: &Value) -> std::collections::HashMap<String, String> {
    as_object(meta, "agent_tool_name_map")
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_urls_finds_nested_urls() {
        let value = json!({
            "results": [
                {"url": "https://a.example"},
                {"nested": {"url": "https://b.example"}},
                {"no_url_here": true},
            ]
        });
        let urls = extract_urls(&value, 50);
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn extract_urls_respects_limit() {
        let value = json!({"a": {"url": "1"}, "b": {"url": "2"}, "c": {"url": "3"}});
        assert_eq!(extract_urls(&value, 2).len(), 2);
    }

    #[test]
    fn as_u32_rejects_negative() {
        let value = json!({"output_index": -1});
        assert_eq!(as_u32(&value, "output_index"), None);
    }

    #[test]
    fn stream_scope_requires_agent_tool_type() {
        let value = json!({"type": "other", "tool_call_id": "call_1"});
        assert!(stream_scope_from_raw(&value).is_none());
    }

    #[test]
    fn stream_scope_rejects_empty_tool_call_id() {
        let value = json!({"type": "agent_tool", "tool_call_id": ""});
        assert!(stream_scope_from_raw(&value).is_none());
    }

    #[test]
    fn now_iso_ends_with_z() {
        assert!(now_iso().ends_with('Z'));
    }
}
