use neuron_sse_types::{PublicEvent, ToolCodeDeltaEvent, ToolCodeDoneEvent};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::item_scope_from_raw;
use crate::util::as_str;

use super::HandlerCtx;

/// Forwards code-interpreter source-code deltas/done frames verbatim as
/// `tool.code.delta`/`tool.code.done`.
pub(crate) fn handle_code_interpreter(event: &InternalEvent, ctx: &mut HandlerCtx) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    let Some(raw_type) = event.raw_type.as_deref() else {
        return Vec::new();
    };
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    let Some(tool_call_id) = as_str(raw, "item_id").map(str::to_string) else {
        return Vec::new();
    };

    if raw_type.ends_with("code.delta") {
        let Some(delta) = as_str(raw, "delta") else {
            return Vec::new();
        };
        let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
        vec![PublicEvent::ToolCodeDelta(ToolCodeDeltaEvent { envelope, tool_call_id, delta: delta.to_string() })]
    } else if raw_type.ends_with("code.done") {
        let Some(code) = as_str(raw, "code") else {
            return Vec::new();
        };
        let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
        vec![PublicEvent::ToolCodeDone(ToolCodeDoneEvent { envelope, tool_call_id, code: code.to_string() })]
    } else {
        Vec::new()
    }
}
