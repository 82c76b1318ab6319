use neuron_sse_types::{
    PublicEvent, ReasoningSummaryDeltaEvent, ReasoningSummaryPartAddedEvent, ReasoningSummaryPartDoneEvent,
};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::item_scope_from_raw;
use crate::state::ProjectionState;
use crate::util::{as_object, as_str, as_u32};

use super::HandlerCtx;

fn handle_delta(
    state: &mut ProjectionState,
    event: &InternalEvent,
    raw: &serde_json::Value,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let Some(delta) = event.reasoning_delta.clone() else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    state.reasoning_summary_text.push_str(&delta);
    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    vec![PublicEvent::ReasoningSummaryDelta(ReasoningSummaryDeltaEvent {
        envelope,
        summary_index: as_u32(raw, "summary_index"),
        delta,
    })]
}

fn handle_done(
    state: &mut ProjectionState,
    event: &InternalEvent,
    raw: &serde_json::Value,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let Some(full_text) = as_str(raw, "text") else {
        return Vec::new();
    };
    let suffix = if state.reasoning_summary_text.is_empty() {
        Some(full_text.to_string())
    } else if let Some(rest) = full_text.strip_prefix(state.reasoning_summary_text.as_str()) {
        if rest.is_empty() { None } else { Some(rest.to_string()) }
    } else {
        None
    };
    let Some(delta) = suffix else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    state.reasoning_summary_text.push_str(&delta);
    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    vec![PublicEvent::ReasoningSummaryDelta(ReasoningSummaryDeltaEvent {
        envelope,
        summary_index: as_u32(raw, "summary_index"),
        delta,
    })]
}

fn handle_part(
    event: &InternalEvent,
    raw: &serde_json::Value,
    is_done: bool,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    let Some(summary_index) = as_u32(raw, "summary_index") else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    let part = as_object(raw, "part");
    let part_type = part.and_then(|p| p.get("type")).and_then(serde_json::Value::as_str).unwrap_or("").to_string();
    let text = part
        .filter(|_| part_type == "summary_text")
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    if is_done {
        let Some(text) = text else {
            return Vec::new();
        };
        vec![PublicEvent::ReasoningSummaryPartDone(ReasoningSummaryPartDoneEvent {
            envelope,
            summary_index,
            part_type,
            text,
        })]
    } else {
        vec![PublicEvent::ReasoningSummaryPartAdded(ReasoningSummaryPartAddedEvent {
            envelope,
            summary_index,
            part_type,
            text,
        })]
    }
}

/// Dispatches reasoning-summary delta/done/part raw frames.
pub(crate) fn handle_reasoning_summary(
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

    if raw_type.ends_with("summary_text.delta") {
        handle_delta(state, event, raw, ctx)
    } else if raw_type.ends_with("summary_text.done") {
        handle_done(state, event, raw, ctx)
    } else if raw_type.ends_with("summary_part.added") {
        handle_part(event, raw, false, ctx)
    } else if raw_type.ends_with("summary_part.done") {
        handle_part(event, raw, true, ctx)
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
    fn delta_accumulates_and_forwards() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut event = InternalEvent::raw(
            "response.reasoning_summary_text.delta",
            json!({"item_id": "msg_1", "output_index": 0, "summary_index": 0}),
        );
        event.reasoning_delta = Some("thinking".to_string());
        handle_reasoning_summary(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(state.reasoning_summary_text, "thinking");
    }

    #[test]
    fn done_emits_only_suffix_when_prefix_matches() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.reasoning_summary_text = "thinking".to_string();
        let event = InternalEvent::raw(
            "response.reasoning_summary_text.done",
            json!({"item_id": "msg_1", "output_index": 0, "text": "thinking hard"}),
        );
        let result = handle_reasoning_summary(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::ReasoningSummaryDelta(e) => assert_eq!(e.delta, " hard"),
            _ => panic!(),
        }
        assert_eq!(state.reasoning_summary_text, "thinking hard");
    }

    #[test]
    fn done_emits_nothing_when_divergent_and_non_empty() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.reasoning_summary_text = "alpha".to_string();
        let event = InternalEvent::raw(
            "response.reasoning_summary_text.done",
            json!({"item_id": "msg_1", "output_index": 0, "text": "beta"}),
        );
        assert!(handle_reasoning_summary(&mut state, &event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }

    #[test]
    fn part_done_is_suppressed_for_non_summary_text_parts() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw(
            "response.reasoning_summary_part.done",
            json!({"item_id": "msg_1", "output_index": 0, "summary_index": 0, "part": {"type": "other"}}),
        );
        assert!(handle_reasoning_summary(&mut state, &event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }
}
