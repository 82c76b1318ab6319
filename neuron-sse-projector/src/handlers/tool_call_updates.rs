use neuron_sse_types::PublicEvent;

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::tool_scope;
use crate::state::ProjectionState;
use crate::tooling::merge_tool_call_into_state;

use super::HandlerCtx;

/// Merges a declarative tool-call snapshot (`event.tool_call`), if present,
/// into the matching [`crate::state::ToolState`]. The state is always kept
/// current, but the merged result is only announced as a public `tool.status`
/// when this frame is the `response.output_item.done` marker — any other
/// frame carrying a `tool_call` snapshot (a delta, an `output_item.added`)
/// updates state silently.
pub(crate) fn handle_tool_call_updates(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let Some(tool_call) = event.tool_call.as_ref() else {
        return Vec::new();
    };
    let Some(merged) = merge_tool_call_into_state(
        state,
        tool_call,
        ctx.config.max_file_search_results,
        ctx.config.max_file_search_text_chars,
    ) else {
        return Vec::new();
    };

    let is_output_item_done = event.kind == InternalEventKind::RawResponseEvent
        && event.raw_type.as_deref() == Some("response.output_item.done");
    if !is_output_item_done {
        return Vec::new();
    }

    let Some((item_id, output_index)) = tool_scope(
        &merged.tool_call_id,
        state.tool_state.get_mut(&merged.tool_call_id).expect("just inserted by merge"),
        Some(tool_call),
    ) else {
        return Vec::new();
    };

    let tool = state.tool_state[&merged.tool_call_id].to_public_tool(&merged.tool_call_id);
    let envelope = ctx.builder.item(
        ctx.event_id,
        item_id,
        output_index,
        event.sequence_number,
        Some(merged.notices),
    );
    vec![PublicEvent::ToolStatus(neuron_sse_types::ToolStatusEvent { envelope, tool })]
}
