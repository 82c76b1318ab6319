use neuron_sse_types::{ArgsToolType, PublicEvent, ToolArgumentsDeltaEvent, ToolArgumentsDoneEvent, ToolStatusEvent, ToolType};

use crate::chunk::{chunk, ChunkPiece};
use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::sanitize::{sanitize_json, truncate_string};
use crate::scope::item_scope_from_raw;
use crate::state::{ProjectionState, ToolState};
use crate::tooling::args_tool_type_from_raw_type;
use crate::util::{agent_tool_name_map_from_meta, agent_tool_names_from_meta, as_str, safe_json_parse};

use super::HandlerCtx;

fn handle_delta(
    state: &mut ProjectionState,
    event: &InternalEvent,
    raw: &serde_json::Value,
    raw_type: &str,
) -> Vec<PublicEvent> {
    let Some(tool_call_id) = as_str(raw, "item_id").map(str::to_string) else {
        return Vec::new();
    };
    let Some(delta) = as_str(raw, "delta") else {
        return Vec::new();
    };
    let args_tool_type = args_tool_type_from_raw_type(raw_type);
    let base_tool_type = match args_tool_type {
        ArgsToolType::Mcp => ToolType::Mcp,
        _ => ToolType::Function,
    };
    state
        .tool_state
        .entry(tool_call_id)
        .or_insert_with(|| ToolState::new(base_tool_type))
        .arguments_text
        .push_str(delta);
    let _ = event;
    Vec::new()
}

fn to_args_tool_type(tool_type: ToolType) -> ArgsToolType {
    match tool_type {
        ToolType::Agent => ArgsToolType::Agent,
        ToolType::Mcp => ArgsToolType::Mcp,
        _ => ArgsToolType::Function,
    }
}

#[allow(clippy::too_many_lines)]
fn handle_done(
    state: &mut ProjectionState,
    event: &InternalEvent,
    raw: &serde_json::Value,
    raw_type: &str,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let Some(tool_call_id) = as_str(raw, "item_id").map(str::to_string) else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };

    let args_tool_type = args_tool_type_from_raw_type(raw_type);
    let base_tool_type = match args_tool_type {
        ArgsToolType::Mcp => ToolType::Mcp,
        _ => ToolType::Function,
    };
    state.tool_state.entry(tool_call_id.clone()).or_insert_with(|| ToolState::new(base_tool_type));

    let tool_name = as_str(raw, "name")
        .map(str::to_string)
        .or_else(|| state.tool_state[&tool_call_id].tool_name.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let agent_tool_names = event.metadata.as_ref().map(agent_tool_names_from_meta).unwrap_or_default();
    let agent_tool_map = event.metadata.as_ref().map(agent_tool_name_map_from_meta).unwrap_or_default();

    let tool_state = state.tool_state.get_mut(&tool_call_id).expect("just inserted");
    tool_state.tool_name = Some(tool_name.clone());
    let upgraded_to_agent = tool_state.tool_type == ToolType::Function && agent_tool_names.contains(&tool_name);
    if upgraded_to_agent {
        tool_state.tool_type = ToolType::Agent;
        tool_state.agent_name = agent_tool_map.get(&tool_name).cloned();
    }
    let effective_args_tool_type = to_args_tool_type(tool_state.tool_type);

    let raw_arguments_text = as_str(raw, "arguments").unwrap_or(&tool_state.arguments_text).to_string();
    let parsed = safe_json_parse(&raw_arguments_text);
    let mut notices = Vec::new();
    let (sanitized_json, sanitized_text) = match parsed {
        Some(value) if value.is_object() => {
            let (sanitized, sanitize_notices) =
                sanitize_json(&value, "arguments_json", ctx.config.max_string_chars_arguments);
            notices.extend(sanitize_notices);
            let text = serde_json::to_string(&sanitized).unwrap_or_default();
            (Some(sanitized), text)
        }
        _ => (None, raw_arguments_text),
    };
    let (final_text, truncation_notice) = truncate_string(&sanitized_text, "arguments_text", ctx.config.max_string_chars_tool_output);
    if let Some(notice) = truncation_notice {
        notices.push(notice);
    }

    let mut out = Vec::new();

    if !tool_state.in_progress_announced {
        tool_state.in_progress_announced = true;
        let tool = tool_state.to_public_tool(&tool_call_id);
        let envelope = ctx.builder.item(ctx.event_id, item_id.clone(), output_index, event.sequence_number, None);
        out.push(PublicEvent::ToolStatus(ToolStatusEvent { envelope, tool }));
    }

    for piece in chunk(&final_text, ctx.config.tool_arguments_chunk_chars) {
        if let ChunkPiece::Delta { data, .. } = piece {
            let envelope = ctx.builder.item(ctx.event_id, item_id.clone(), output_index, event.sequence_number, None);
            out.push(PublicEvent::ToolArgumentsDelta(ToolArgumentsDeltaEvent {
                envelope,
                tool_call_id: tool_call_id.clone(),
                tool_type: effective_args_tool_type,
                tool_name: tool_name.clone(),
                delta: data,
            }));
        }
    }

    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, Some(notices));
    out.push(PublicEvent::ToolArgumentsDone(ToolArgumentsDoneEvent {
        envelope,
        tool_call_id,
        tool_type: effective_args_tool_type,
        tool_name,
        arguments_text: final_text,
        arguments_json: sanitized_json,
    }));

    out
}

/// Accumulates tool-argument deltas silently and, on `...arguments.done`,
/// sanitizes and re-chunks the complete arguments before emitting
/// `tool.status`/`tool.arguments.delta`/`tool.arguments.done`.
pub(crate) fn handle_tool_arguments(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    let Some(raw_type) = event.raw_type.as_deref() else {
        return Vec::new();
    };
    if !raw_type.contains("_call_arguments.") {
        return Vec::new();
    }
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };

    if raw_type.ends_with("arguments.delta") {
        handle_delta(state, event, raw, raw_type)
    } else if raw_type.ends_with("arguments.done") {
        handle_done(state, event, raw, raw_type, ctx)
    } else {
        Vec::new()
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
    fn delta_accumulates_without_emitting() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw(
            "response.function_call_arguments.delta",
            json!({"item_id": "call_1", "output_index": 0, "delta": "{\"q\":"}),
        );
        let result = handle_tool_arguments(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert!(result.is_empty());
        assert_eq!(state.tool_state["call_1"].arguments_text, "{\"q\":");
    }

    #[test]
    fn done_sanitizes_redacts_and_chunks_arguments() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let raw = json!({
            "item_id": "call_1", "output_index": 0, "name": "lookup",
            "arguments": "{\"api_key\":\"sk-secret\",\"q\":\"hi\"}",
        });
        let event = InternalEvent::raw("response.function_call_arguments.done", raw);
        let result = handle_tool_arguments(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(result.len(), 3);
        assert!(matches!(result[0], PublicEvent::ToolStatus(_)));
        assert!(matches!(result[1], PublicEvent::ToolArgumentsDelta(_)));
        match &result[2] {
            PublicEvent::ToolArgumentsDone(e) => {
                assert!(e.arguments_text.contains("<redacted>"));
                assert!(!e.arguments_text.contains("sk-secret"));
                assert_eq!(e.tool_name, "lookup");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn done_upgrades_function_to_agent_when_named_in_metadata() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut event = InternalEvent::raw(
            "response.function_call_arguments.done",
            json!({"item_id": "call_1", "output_index": 0, "name": "researcher", "arguments": "{}"}),
        );
        event.metadata = Some(json!({
            "agent_tool_names": ["researcher"],
            "agent_tool_name_map": {"researcher": "Researcher Agent"},
        }));
        let result = handle_tool_arguments(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::ToolStatus(e) => match &e.tool {
                neuron_sse_types::PublicTool::Agent(agent) => {
                    assert_eq!(agent.agent.as_deref(), Some("Researcher Agent"));
                }
                other => panic!("expected agent tool, got {other:?}"),
            },
            _ => panic!(),
        }
        assert_eq!(state.tool_state["call_1"].tool_type, ToolType::Agent);
    }
}
