use neuron_sse_types::{ChunkDeltaEvent, ChunkDoneEvent, ChunkTarget, ChunkTargetKind, PublicEvent, ToolType};

use crate::chunk::{chunk, default_encoding, ChunkPiece};
use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::tool_scope;
use crate::state::{ProjectionState, ToolState};
use crate::util::{as_i64, as_str};

use super::HandlerCtx;

fn family_for_raw_type(raw_type: &str) -> Option<ToolType> {
    if raw_type.contains("web_search_call") {
        Some(ToolType::WebSearch)
    } else if raw_type.contains("file_search_call") {
        Some(ToolType::FileSearch)
    } else if raw_type.contains("code_interpreter_call") {
        Some(ToolType::CodeInterpreter)
    } else if raw_type.contains("image_generation_call") {
        Some(ToolType::ImageGeneration)
    } else if raw_type.contains("mcp_call") {
        Some(ToolType::Mcp)
    } else {
        None
    }
}

/// Dispatches raw per-family tool status frames (web/file/code/image/MCP),
/// emitting `tool.status` and, for image partial previews, a base64 chunk
/// sequence over `partial_image_b64`.
pub(crate) fn handle_tool_status_raw(
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
    let Some(tool_type) = family_for_raw_type(raw_type) else {
        return Vec::new();
    };
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let Some(tool_call_id) = as_str(raw, "item_id").map(str::to_string) else {
        return Vec::new();
    };
    let status = as_str(raw, "status").map(str::to_string);

    let tool_state = state
        .tool_state
        .entry(tool_call_id.clone())
        .or_insert_with(|| ToolState::new(tool_type));
    if let Some(status) = &status {
        tool_state.last_status = Some(status.clone());
    }
    if tool_type == ToolType::ImageGeneration {
        if let Some(index) = as_i64(raw, "partial_image_index").and_then(|n| u32::try_from(n).ok()) {
            tool_state.image_partial_image_index = Some(index);
        }
    }

    let Some((item_id, output_index)) = tool_scope(&tool_call_id, tool_state, Some(raw)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let tool = state.tool_state[&tool_call_id].to_public_tool(&tool_call_id);
    let envelope = ctx.builder.item(ctx.event_id, item_id.clone(), output_index, event.sequence_number, None);
    out.push(PublicEvent::ToolStatus(neuron_sse_types::ToolStatusEvent { envelope, tool }));

    if tool_type == ToolType::ImageGeneration && status.as_deref() == Some("partial_image") {
        if let Some(b64) = as_str(raw, "partial_image_b64") {
            let target = ChunkTarget {
                entity_kind: ChunkTargetKind::ToolCall,
                entity_id: tool_call_id.clone(),
                field: "partial_image_b64".to_string(),
                part_index: state.tool_state[&tool_call_id].image_partial_image_index,
            };
            for piece in chunk(b64, ctx.config.max_chunk_chars) {
                let envelope = ctx.builder.item(ctx.event_id, item_id.clone(), output_index, event.sequence_number, None);
                match piece {
                    ChunkPiece::Delta { chunk_index, data } => {
                        out.push(PublicEvent::ChunkDelta(ChunkDeltaEvent {
                            envelope,
                            target: target.clone(),
                            encoding: default_encoding(),
                            chunk_index,
                            data,
                        }));
                    }
                    ChunkPiece::Done => {
                        out.push(PublicEvent::ChunkDone(ChunkDoneEvent { envelope, target: target.clone() }));
                    }
                }
            }
        }
    }

    out
}
