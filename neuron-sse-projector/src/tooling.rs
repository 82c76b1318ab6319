//! Declarative tool-call snapshot merging and tool-family status classifiers.

use neuron_sse_types::{
    ArgsToolType, CodeInterpreterStatus, FileSearchResult, ImageGenerationStatus, SearchStatus,
    StreamNotice, ToolType,
};
use serde_json::Value;

use crate::sanitize::truncate_string;
use crate::state::{ProjectionState, ToolState};
use crate::util::{as_array, as_i64, as_object, as_str, as_u32};

/// Classifies a search-family (web/file search) status string, defaulting
/// anything unrecognized to `in_progress` rather than rejecting the frame.
#[must_use]
pub fn as_search_status(status: Option<&str>) -> SearchStatus {
    match status {
        Some("searching") => SearchStatus::Searching,
        Some("completed") => SearchStatus::Completed,
        _ => SearchStatus::InProgress,
    }
}

/// Classifies a code-interpreter status string.
#[must_use]
pub fn as_code_interpreter_status(status: Option<&str>) -> CodeInterpreterStatus {
    match status {
        Some("interpreting") => CodeInterpreterStatus::Interpreting,
        Some("completed") => CodeInterpreterStatus::Completed,
        _ => CodeInterpreterStatus::InProgress,
    }
}

/// Classifies an image-generation status string.
#[must_use]
pub fn as_image_generation_status(status: Option<&str>) -> ImageGenerationStatus {
    match status {
        Some("generating") => ImageGenerationStatus::Generating,
        Some("partial_image") => ImageGenerationStatus::PartialImage,
        Some("completed") => ImageGenerationStatus::Completed,
        _ => ImageGenerationStatus::InProgress,
    }
}

/// `"mcp"` if `raw_type` names an MCP call family, else `"function"`. Mirrors
/// the provider's naming convention of prefixing MCP event names with `mcp_`.
#[must_use]
pub fn args_tool_type_from_raw_type(raw_type: &str) -> ArgsToolType {
    if raw_type.contains("mcp_") {
        ArgsToolType::Mcp
    } else {
        ArgsToolType::Function
    }
}

/// Best-effort tool name extraction from a run-item's raw item payload,
/// trying `name` first and falling back to a `tool_name` alias.
#[must_use]
pub fn tool_name_from_run_item(raw_item: &Value) -> Option<String> {
    as_str(raw_item, "name")
        .or_else(|| as_str(raw_item, "tool_name"))
        .map(str::to_string)
}

/// Coerces a provider-reported file-search result list: keeps at most
/// `max_results` entries (dropping the rest with a single list-level
/// notice), truncates each entry's `text` to `max_text_chars`, and silently
/// skips entries missing a `file_id`.
pub fn coerce_file_search_results(
    results: &[Value],
    max_results: usize,
    max_text_chars: usize,
) -> (Vec<FileSearchResult>, Vec<StreamNotice>) {
    let mut notices = Vec::new();
    let mut out = Vec::new();

    for (i, entry) in results.iter().enumerate() {
        if out.len() >= max_results {
            break;
        }
        let Some(file_id) = as_str(entry, "file_id").map(str::to_string) else {
            continue;
        };
        let text = as_str(entry, "text").map(|t| {
            let (truncated, notice) =
                truncate_string(t, &format!("tool.results[{i}].text"), max_text_chars);
            if let Some(notice) = notice {
                notices.push(notice);
            }
            truncated
        });
        out.push(FileSearchResult {
            file_id,
            filename: as_str(entry, "filename").map(str::to_string),
            score: entry.get("score").and_then(Value::as_f64),
            vector_store_id: as_str(entry, "vector_store_id").map(str::to_string),
            attributes: entry.get("attributes").cloned(),
            text,
        });
    }

    if results.len() > max_results {
        notices.push(StreamNotice::truncated("tool.results", max_results));
    }

    (out, notices)
}

/// Outcome of merging a declarative tool-call snapshot into per-tool state.
pub struct MergedToolCall {
    /// Identifier of the merged tool call.
    pub tool_call_id: String,
    /// Tool family the snapshot belongs to.
    pub tool_type: ToolType,
    /// Status string the snapshot reported, if any.
    pub status: Option<String>,
    /// Notices produced while coercing the snapshot (e.g. file-search truncation).
    pub notices: Vec<StreamNotice>,
}

/// Merges a declarative tool-call snapshot keyed by tool family
/// (`{"web_search_call": {...}}`, `{"file_search_call": {...}}`,
/// `{"code_interpreter_call": {...}}`, or `{"image_generation_call": {...}}`)
/// into the matching [`ToolState`], creating it on first observation.
///
/// Only these four built-in, declaratively-snapshotted families are merged
/// here; function/MCP/agent tools are populated incrementally by the raw
/// output-item and tool-argument handlers instead.
pub fn merge_tool_call_into_state(
    state: &mut ProjectionState,
    tool_call: &Value,
    max_file_search_results: usize,
    max_file_search_text_chars: usize,
) -> Option<MergedToolCall> {
    let (key, tool_type) = [
        ("web_search_call", ToolType::WebSearch),
        ("file_search_call", ToolType::FileSearch),
        ("code_interpreter_call", ToolType::CodeInterpreter),
        ("image_generation_call", ToolType::ImageGeneration),
    ]
    .into_iter()
    .find(|(key, _)| tool_call.get(*key).is_some())?;

    let inner = as_object(tool_call, key)?;
    let inner = Value::Object(inner.clone());
    let tool_call_id = as_str(&inner, "id")?.to_string();
    let status = as_str(&inner, "status").map(str::to_string);
    let mut notices = Vec::new();

    let tool_state = state
        .tool_state
        .entry(tool_call_id.clone())
        .or_insert_with(|| ToolState::new(tool_type));

    if let Some(output_index) = as_u32(tool_call, "output_index") {
        tool_state.output_index.get_or_insert(output_index);
    }
    if let Some(status) = &status {
        tool_state.last_status = Some(status.clone());
    }

    match tool_type {
        ToolType::WebSearch => {
            if let Some(query) = as_object(&inner, "action").and_then(|a| a.get("query")).and_then(Value::as_str) {
                tool_state.query = Some(query.to_string());
            }
            state.last_web_search_tool_call_id = Some(tool_call_id.clone());
        }
        ToolType::FileSearch => {
            if let Some(queries) = as_array(&inner, "queries") {
                tool_state.file_search_queries =
                    queries.iter().filter_map(Value::as_str).map(str::to_string).collect();
            }
            if let Some(results) = as_array(&inner, "results") {
                let (coerced, result_notices) =
                    coerce_file_search_results(results, max_file_search_results, max_file_search_text_chars);
                tool_state.file_search_results = coerced;
                notices.extend(result_notices);
            }
        }
        ToolType::CodeInterpreter => {
            if let Some(container_id) = as_str(&inner, "container_id") {
                tool_state.container_id = Some(container_id.to_string());
            }
            if let Some(container_mode) = as_str(&inner, "container_mode") {
                tool_state.container_mode = Some(container_mode.to_string());
            }
        }
        ToolType::ImageGeneration => {
            if let Some(v) = as_str(&inner, "revised_prompt") {
                tool_state.image_revised_prompt = Some(v.to_string());
            }
            if let Some(v) = as_str(&inner, "format") {
                tool_state.image_format = Some(v.to_string());
            }
            if let Some(v) = as_str(&inner, "size") {
                tool_state.image_size = Some(v.to_string());
            }
            if let Some(v) = as_str(&inner, "quality") {
                tool_state.image_quality = Some(v.to_string());
            }
            if let Some(v) = as_str(&inner, "background") {
                tool_state.image_background = Some(v.to_string());
            }
            if let Some(v) = as_i64(&inner, "partial_image_index") {
                tool_state.image_partial_image_index = u32::try_from(v).ok();
            }
        }
        _ => {}
    }

    Some(MergedToolCall {
        tool_call_id,
        tool_type,
        status,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_known_search_statuses() {
        assert_eq!(as_search_status(Some("searching")), SearchStatus::Searching);
        assert_eq!(as_search_status(Some("completed")), SearchStatus::Completed);
    }

    #[test]
    fn unknown_search_status_defaults_to_in_progress() {
        assert_eq!(as_search_status(Some("bogus")), SearchStatus::InProgress);
        assert_eq!(as_search_status(None), SearchStatus::InProgress);
    }

    #[test]
    fn args_tool_type_detects_mcp_by_prefix() {
        assert_eq!(args_tool_type_from_raw_type("response.mcp_call.done"), ArgsToolType::Mcp);
        assert_eq!(args_tool_type_from_raw_type("response.function_call_arguments.done"), ArgsToolType::Function);
    }

    #[test]
    fn coerce_file_search_results_caps_and_truncates() {
        let results: Vec<Value> = (0..15)
            .map(|i| json!({"file_id": format!("f{i}"), "text": "x".repeat(3000)}))
            .collect();
        let (coerced, notices) = coerce_file_search_results(&results, 10, 2000);
        assert_eq!(coerced.len(), 10);
        assert_eq!(coerced[0].text.as_ref().unwrap().len(), 2000);
        // one truncation notice per entry plus one list-level notice
        assert_eq!(notices.len(), 11);
    }

    #[test]
    fn coerce_file_search_results_skips_entries_without_file_id() {
        let results = vec![json!({"text": "no id"}), json!({"file_id": "f1"})];
        let (coerced, _) = coerce_file_search_results(&results, 10, 2000);
        assert_eq!(coerced.len(), 1);
        assert_eq!(coerced[0].file_id, "f1");
    }

    #[test]
    fn merge_web_search_call_creates_state_and_captures_query() {
        let mut state = ProjectionState::new();
        let tool_call = json!({
            "web_search_call": {"id": "ws_1", "status": "in_progress", "action": {"query": "weather"}},
            "output_index": 0,
        });
        let merged = merge_tool_call_into_state(&mut state, &tool_call, 10, 2000).unwrap();
        assert_eq!(merged.tool_call_id, "ws_1");
        assert_eq!(merged.tool_type, ToolType::WebSearch);
        assert_eq!(state.tool_state["ws_1"].query.as_deref(), Some("weather"));
        assert_eq!(state.last_web_search_tool_call_id.as_deref(), Some("ws_1"));
    }

    #[test]
    fn merge_returns_none_for_unsupported_shape() {
        let mut state = ProjectionState::new();
        let tool_call = json!({"function_call": {"id": "call_1"}});
        assert!(merge_tool_call_into_state(&mut state, &tool_call, 10, 2000).is_none());
    }
}
