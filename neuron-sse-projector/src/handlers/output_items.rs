use neuron_sse_types::{OutputItemAddedEvent, OutputItemDoneEvent, PublicEvent, ToolType};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::item_scope_from_raw;
use crate::state::{ProjectionState, ToolState};
use crate::util::as_str;

use super::HandlerCtx;

fn tool_type_for_item_type(item_type: &str) -> Option<ToolType> {
    match item_type {
        "web_search_call" => Some(ToolType::WebSearch),
        "file_search_call" => Some(ToolType::FileSearch),
        "code_interpreter_call" => Some(ToolType::CodeInterpreter),
        "image_generation_call" => Some(ToolType::ImageGeneration),
        "function_call" | "custom_tool_call" => Some(ToolType::Function),
        "mcp_call" => Some(ToolType::Mcp),
        _ => None,
    }
}

fn seed_tool_state(state: &mut ProjectionState, raw: &serde_json::Value, item_type: &str, output_index: u32) {
    let Some(tool_type) = tool_type_for_item_type(item_type) else {
        return;
    };
    let Some(tool_call_id) = as_str(raw, "id") else {
        return;
    };
    let tool_state = state
        .tool_state
        .entry(tool_call_id.to_string())
        .or_insert_with(|| ToolState::new(tool_type));
    tool_state.output_index.get_or_insert(output_index);
    if let Some(name) = as_str(raw, "name").or_else(|| as_str(raw, "tool_name")) {
        tool_state.tool_name = Some(name.to_string());
    }
    if let Some(server_label) = as_str(raw, "server_label") {
        tool_state.server_label = Some(server_label.to_string());
    }
}

/// Emits `output_item.added`/`output_item.done` and, for tool-shaped items,
/// seeds or updates the matching [`ToolState`].
pub(crate) fn handle_output_items(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    let is_added = event.raw_type.as_deref() == Some("response.output_item.added");
    let is_done = event.raw_type.as_deref() == Some("response.output_item.done");
    if !is_added && !is_done {
        return Vec::new();
    }
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    let item_type = as_str(raw, "item_type").unwrap_or("unknown").to_string();
    let role = as_str(raw, "role").map(str::to_string);
    let status = as_str(raw, "status").map(str::to_string);

    seed_tool_state(state, raw, &item_type, output_index);

    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    if is_added {
        vec![PublicEvent::OutputItemAdded(OutputItemAddedEvent { envelope, item_type, role, status })]
    } else {
        vec![PublicEvent::OutputItemDone(OutputItemDoneEvent { envelope, item_type, role, status })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnvelopeBuilder;
    use crate::config::ProjectorConfig;
    use serde_json::json;

    fn ctx<'a>(builder: &'a EnvelopeBuilder<'a>, event_id: &'a mut u64, config: &'a ProjectorConfig) -> HandlerCtx<'a> {
        HandlerCtx { builder, event_id, config }
    }

    #[test]
    fn added_message_item_emits_output_item_added() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let raw = json!({"item_id": "msg_1", "output_index": 0, "item_type": "message", "role": "assistant"});
        let event = InternalEvent::raw("response.output_item.added", raw);
        let result = handle_output_items(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::OutputItemAdded(e) => {
                assert_eq!(e.item_type, "message");
                assert_eq!(e.role.as_deref(), Some("assistant"));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn tool_shaped_item_seeds_tool_state() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let raw = json!({
            "item_id": "item_1", "output_index": 1, "item_type": "function_call",
            "id": "call_1", "name": "lookup",
        });
        let event = InternalEvent::raw("response.output_item.added", raw);
        handle_output_items(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        let tool_state = state.tool_state.get("call_1").unwrap();
        assert_eq!(tool_state.tool_type, ToolType::Function);
        assert_eq!(tool_state.tool_name.as_deref(), Some("lookup"));
        assert_eq!(tool_state.output_index, Some(1));
    }

    #[test]
    fn missing_scope_suppresses_event() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw("response.output_item.added", json!({"item_type": "message"}));
        assert!(handle_output_items(&mut state, &event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }
}
