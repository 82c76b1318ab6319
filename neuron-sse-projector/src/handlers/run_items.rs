use neuron_sse_types::{PublicEvent, ToolOutputEvent, ToolStatusEvent, ToolType};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::sanitize::sanitize_json;
use crate::scope::tool_scope;
use crate::state::{ProjectionState, ToolState};
use crate::util::extract_urls;

use super::HandlerCtx;

const MAX_EXTRACTED_URLS: usize = 50;

fn classify_tool_type(run_item_type: Option<&str>) -> ToolType {
    let Some(run_item_type) = run_item_type else {
        return ToolType::Function;
    };
    if run_item_type.contains("mcp") {
        ToolType::Mcp
    } else if run_item_type.contains("web_search") {
        ToolType::WebSearch
    } else if run_item_type.contains("file_search") {
        ToolType::FileSearch
    } else if run_item_type.contains("code_interpreter") {
        ToolType::CodeInterpreter
    } else if run_item_type.contains("image_generation") {
        ToolType::ImageGeneration
    } else {
        ToolType::Function
    }
}

fn emit_tool_status(
    state: &ProjectionState,
    tool_call_id: &str,
    item_id: String,
    output_index: u32,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> PublicEvent {
    let tool = state.tool_state[tool_call_id].to_public_tool(tool_call_id);
    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    PublicEvent::ToolStatus(ToolStatusEvent { envelope, tool })
}

fn handle_mcp_approval_requested(
    state: &mut ProjectionState,
    event: &InternalEvent,
    tool_call_id: &str,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let tool_state = state
        .tool_state
        .entry(tool_call_id.to_string())
        .or_insert_with(|| ToolState::new(ToolType::Mcp));
    if tool_state.last_status.as_deref() == Some("awaiting_approval") {
        return Vec::new();
    }
    if let Some(tool_name) = event.tool_name.clone() {
        tool_state.tool_name = Some(tool_name);
    }
    tool_state.last_status = Some("awaiting_approval".to_string());
    let Some((item_id, output_index)) = tool_scope(tool_call_id, tool_state, event.event.as_ref()) else {
        return Vec::new();
    };
    vec![emit_tool_status(state, tool_call_id, item_id, output_index, event, ctx)]
}

fn handle_tool_called(
    state: &mut ProjectionState,
    event: &InternalEvent,
    tool_call_id: &str,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let tool_type = classify_tool_type(event.run_item_type.as_deref());
    let tool_state = state
        .tool_state
        .entry(tool_call_id.to_string())
        .or_insert_with(|| ToolState::new(tool_type));
    if tool_state.last_status.as_deref() == Some("in_progress") {
        return Vec::new();
    }
    if let Some(tool_name) = event.tool_name.clone() {
        tool_state.tool_name = Some(tool_name);
    }
    tool_state.last_status = Some("in_progress".to_string());
    let Some((item_id, output_index)) = tool_scope(tool_call_id, tool_state, event.event.as_ref()) else {
        return Vec::new();
    };
    vec![emit_tool_status(state, tool_call_id, item_id, output_index, event, ctx)]
}

fn handle_tool_output(
    state: &mut ProjectionState,
    event: &InternalEvent,
    tool_call_id: &str,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let tool_type = state
        .tool_state
        .get(tool_call_id)
        .map(|s| s.tool_type)
        .unwrap_or_else(|| classify_tool_type(event.run_item_type.as_deref()));
    let output = event.event.clone().unwrap_or(serde_json::Value::Null);

    let mut out = Vec::new();
    match tool_type {
        ToolType::WebSearch => {
            let tool_state = state
                .tool_state
                .entry(tool_call_id.to_string())
                .or_insert_with(|| ToolState::new(ToolType::WebSearch));
            let new_urls = extract_urls(&output, MAX_EXTRACTED_URLS);
            for url in new_urls {
                if !tool_state.sources.contains(&url) {
                    tool_state.sources.push(url);
                }
            }
            if tool_state.last_status.is_none() {
                tool_state.last_status = Some("completed".to_string());
            }
            let Some((item_id, output_index)) = tool_scope(tool_call_id, tool_state, event.event.as_ref()) else {
                return Vec::new();
            };
            out.push(emit_tool_status(state, tool_call_id, item_id, output_index, event, ctx));
        }
        ToolType::Function | ToolType::Mcp | ToolType::Agent => {
            let (sanitized, notices) = sanitize_json(&output, "output", ctx.config.max_string_chars_tool_output);
            let tool_state = state
                .tool_state
                .entry(tool_call_id.to_string())
                .or_insert_with(|| ToolState::new(tool_type));
            tool_state.last_status = Some("completed".to_string());
            let Some((item_id, output_index)) = tool_scope(tool_call_id, tool_state, event.event.as_ref()) else {
                return Vec::new();
            };

            let envelope =
                ctx.builder.item(ctx.event_id, item_id.clone(), output_index, event.sequence_number, Some(notices));
            out.push(PublicEvent::ToolOutput(ToolOutputEvent {
                envelope,
                tool_call_id: tool_call_id.to_string(),
                tool_type,
                output: sanitized,
            }));
            out.push(emit_tool_status(state, tool_call_id, item_id, output_index, event, ctx));
        }
        _ => {}
    }
    out
}

/// Handles higher-level run-item events: `tool_called`, `tool_output`, and
/// `mcp_approval_requested`.
pub(crate) fn handle_run_item(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RunItemStreamEvent {
        return Vec::new();
    }
    let Some(tool_call_id) = event.tool_call_id.clone() else {
        return Vec::new();
    };
    match event.run_item_name.as_deref() {
        Some("mcp_approval_requested") => handle_mcp_approval_requested(state, event, &tool_call_id, ctx),
        Some("tool_called") => handle_tool_called(state, event, &tool_call_id, ctx),
        Some("tool_output") => handle_tool_output(state, event, &tool_call_id, ctx),
        _ => Vec::new(),
    }
}
