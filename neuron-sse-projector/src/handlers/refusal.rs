use neuron_sse_types::{PublicEvent, RefusalDeltaEvent, RefusalDoneEvent};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::item_scope_from_raw;
use crate::state::ProjectionState;
use crate::util::{as_str, as_u32};

use super::HandlerCtx;

/// Forwards refusal deltas (accumulating into `refusal_text`) and the final
/// `refusal.done`, which replaces rather than appends.
pub(crate) fn handle_refusal(
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
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    let Some(content_index) = as_u32(raw, "content_index") else {
        return Vec::new();
    };

    if raw_type.ends_with("refusal.delta") {
        let Some(delta) = as_str(raw, "delta") else {
            return Vec::new();
        };
        state.refusal_text.push_str(delta);
        let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
        vec![PublicEvent::RefusalDelta(RefusalDeltaEvent { envelope, content_index, delta: delta.to_string() })]
    } else if raw_type.ends_with("refusal.done") {
        let Some(refusal_text) = as_str(raw, "refusal") else {
            return Vec::new();
        };
        state.refusal_text = refusal_text.to_string();
        let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
        vec![PublicEvent::RefusalDone(RefusalDoneEvent {
            envelope,
            content_index,
            refusal_text: refusal_text.to_string(),
        })]
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
    fn delta_appends_to_refusal_text() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.refusal_text = "I ".to_string();
        let event = InternalEvent::raw(
            "response.refusal.delta",
            json!({"item_id": "msg_1", "output_index": 0, "content_index": 0, "delta": "cannot"}),
        );
        handle_refusal(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(state.refusal_text, "I cannot");
    }

    #[test]
    fn done_replaces_rather_than_appends() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.refusal_text = "partial".to_string();
        let event = InternalEvent::raw(
            "response.refusal.done",
            json!({"item_id": "msg_1", "output_index": 0, "content_index": 0, "refusal": "I cannot help with that"}),
        );
        let result = handle_refusal(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(state.refusal_text, "I cannot help with that");
        match &result[0] {
            PublicEvent::RefusalDone(e) => assert_eq!(e.refusal_text, "I cannot help with that"),
            _ => panic!(),
        }
    }
}
