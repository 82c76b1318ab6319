//! Derives `(item_id, output_index)` pairs from raw frames or tool state.

use serde_json::Value;

use crate::state::ToolState;
use crate::util::{as_str, as_u32};

/// Resolves an item scope directly from a raw frame's `item_id`/`output_index`.
/// Returns `None` if either is missing or malformed, so the caller can
/// suppress the event rather than emit it without a valid scope.
pub fn item_scope_from_raw(raw: &Value) -> Option<(String, u32)> {
    let item_id = as_str(raw, "item_id")?.to_string();
    let output_index = as_u32(raw, "output_index")?;
    Some((item_id, output_index))
}

/// Resolves a tool's scope, preferring the cached `output_index` on its
/// [`ToolState`] and falling back to (and caching) the raw frame's value.
pub fn tool_scope(tool_call_id: &str, tool_state: &mut ToolState, raw: Option<&Value>) -> Option<(String, u32)> {
    if let Some(output_index) = tool_state.output_index {
        return Some((tool_call_id.to_string(), output_index));
    }
    let output_index = raw.and_then(|raw| as_u32(raw, "output_index"))?;
    tool_state.output_index = Some(output_index);
    Some((tool_call_id.to_string(), output_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuron_sse_types::ToolType;
    use serde_json::json;

    #[test]
    fn item_scope_requires_both_fields() {
        assert_eq!(item_scope_from_raw(&json!({"item_id": "msg_1"})), None);
        assert_eq!(item_scope_from_raw(&json!({"output_index": 0})), None);
        assert_eq!(
            item_scope_from_raw(&json!({"item_id": "msg_1", "output_index": 2})),
            Some(("msg_1".to_string(), 2))
        );
    }

    #[test]
    fn tool_scope_prefers_cached_output_index() {
        let mut state = ToolState::new(ToolType::WebSearch);
        state.output_index = Some(5);
        let raw = json!({"output_index": 99});
        assert_eq!(tool_scope("call_1", &mut state, Some(&raw)), Some(("call_1".to_string(), 5)));
    }

    #[test]
    fn tool_scope_caches_raw_output_index_when_absent() {
        let mut state = ToolState::new(ToolType::WebSearch);
        let raw = json!({"output_index": 7});
        assert_eq!(tool_scope("call_1", &mut state, Some(&raw)), Some(("call_1".to_string(), 7)));
        assert_eq!(state.output_index, Some(7));
    }

    #[test]
    fn tool_scope_returns_none_without_any_source() {
        let mut state = ToolState::new(ToolType::WebSearch);
        assert_eq!(tool_scope("call_1", &mut state, None), None);
    }
}
