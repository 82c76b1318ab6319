use neuron_sse_types::{
    LifecycleEvent, LifecycleStatus, MemoryCheckpointEvent, MemoryCheckpointPayload,
    MemoryCheckpointStrategy, PublicEvent,
};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::state::ProjectionState;
use crate::util::{as_array, as_bool, as_i64, as_str, as_u32};

use super::HandlerCtx;

fn response_status_for_raw_type(raw_type: &str) -> Option<LifecycleStatus> {
    match raw_type {
        "response.created" | "response.in_progress" => Some(LifecycleStatus::InProgress),
        "response.queued" => Some(LifecycleStatus::Queued),
        "response.completed" => Some(LifecycleStatus::Completed),
        "response.failed" => Some(LifecycleStatus::Failed),
        "response.incomplete" => Some(LifecycleStatus::Incomplete),
        _ => None,
    }
}

/// Maps `response.{created,in_progress,queued,completed,failed,incomplete}`
/// raw frames to a `lifecycle` event, caching the status on `state`.
pub(crate) fn handle_response_lifecycle(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    let Some(status) = event.raw_type.as_deref().and_then(response_status_for_raw_type) else {
        return Vec::new();
    };
    let reason = event.raw_event.as_ref().and_then(|raw| as_str(raw, "reason")).map(str::to_string);

    state.lifecycle_status = Some(status);
    let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
    vec![PublicEvent::Lifecycle(LifecycleEvent { envelope, status, reason })]
}

/// Surfaces an out-of-band cancellation signal as `lifecycle{status:cancelled}`.
pub(crate) fn handle_service_lifecycle(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::Lifecycle {
        return Vec::new();
    }
    let Some(payload) = event.payload.as_ref() else {
        return Vec::new();
    };
    let is_cancellation = matches!(as_str(payload, "state"), Some("cancelled") | Some("canceled"));
    if !is_cancellation {
        return Vec::new();
    }

    let reason = as_str(payload, "reason").map(str::to_string);
    state.lifecycle_status = Some(LifecycleStatus::Cancelled);
    let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
    vec![PublicEvent::Lifecycle(LifecycleEvent {
        envelope,
        status: LifecycleStatus::Cancelled,
        reason,
    })]
}

fn coerce_strategy(value: Option<&str>) -> MemoryCheckpointStrategy {
    match value {
        Some("summarize") => MemoryCheckpointStrategy::Summarize,
        Some("trim") => MemoryCheckpointStrategy::Trim,
        _ => MemoryCheckpointStrategy::Compact,
    }
}

/// Reads a `u32` field, rejecting JSON booleans even though
/// `serde_json::Value::as_u64` would otherwise accept them as 0/1.
fn as_u32_strict(value: &serde_json::Value, key: &str) -> Option<u32> {
    if value.get(key).is_some_and(serde_json::Value::is_boolean) {
        return None;
    }
    as_u32(value, key)
}

fn as_u64_strict(value: &serde_json::Value, key: &str) -> Option<u64> {
    if value.get(key).is_some_and(serde_json::Value::is_boolean) {
        return None;
    }
    as_i64(value, key).and_then(|n| u64::try_from(n).ok())
}

fn as_string_list(value: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    as_array(value, key).map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
}

/// Emits `memory.checkpoint` when a compaction event is reported, coercing
/// every numeric/boolean/list field defensively per
/// [`MemoryCheckpointPayload`].
pub(crate) fn handle_memory_checkpoint(
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::Lifecycle {
        return Vec::new();
    }
    let Some(payload) = event.payload.as_ref() else {
        return Vec::new();
    };
    if as_str(payload, "event") != Some("memory_compaction") {
        return Vec::new();
    }

    let checkpoint = MemoryCheckpointPayload {
        strategy: coerce_strategy(as_str(payload, "strategy")),
        trigger_reason: as_str(payload, "trigger_reason").map(str::to_string),
        tokens_before: as_u64_strict(payload, "tokens_before"),
        tokens_after: as_u64_strict(payload, "tokens_after"),
        compacted_count: as_u32_strict(payload, "compacted_count"),
        compacted_inputs: as_u32_strict(payload, "compacted_inputs"),
        compacted_outputs: as_u32_strict(payload, "compacted_outputs"),
        keep_turns: as_u32_strict(payload, "keep_turns"),
        trigger_turns: as_u32_strict(payload, "trigger_turns"),
        clear_tool_inputs: as_bool(payload, "clear_tool_inputs"),
        excluded_tools: as_string_list(payload, "excluded_tools"),
        included_tools: as_string_list(payload, "included_tools"),
        total_items_before: as_u32_strict(payload, "total_items_before"),
        total_items_after: as_u32_strict(payload, "total_items_after"),
        turns_before: as_u32_strict(payload, "turns_before"),
        turns_after: as_u32_strict(payload, "turns_after"),
    };

    let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
    vec![PublicEvent::MemoryCheckpoint(MemoryCheckpointEvent { envelope, checkpoint })]
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
    fn response_created_maps_to_in_progress() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw("response.created", json!({}));
        let result = handle_response_lifecycle(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(state.lifecycle_status, Some(LifecycleStatus::InProgress));
        match &result[0] {
            PublicEvent::Lifecycle(e) => assert_eq!(e.status, LifecycleStatus::InProgress),
            _ => panic!(),
        }
    }

    #[test]
    fn response_queued_maps_to_queued() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw("response.queued", json!({}));
        let result = handle_response_lifecycle(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(state.lifecycle_status, Some(LifecycleStatus::Queued));
        match &result[0] {
            PublicEvent::Lifecycle(e) => assert_eq!(e.status, LifecycleStatus::Queued),
            _ => panic!(),
        }
    }

    #[test]
    fn unrecognized_raw_type_is_ignored() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let event = InternalEvent::raw("response.output_text.delta", json!({}));
        assert!(handle_response_lifecycle(&mut state, &event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }

    #[test]
    fn cancellation_signal_emits_cancelled_lifecycle() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut event = InternalEvent::new(InternalEventKind::Lifecycle);
        event.payload = Some(json!({"state": "cancelled", "reason": "user requested"}));
        let result = handle_service_lifecycle(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::Lifecycle(e) => {
                assert_eq!(e.status, LifecycleStatus::Cancelled);
                assert_eq!(e.reason.as_deref(), Some("user requested"));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn memory_compaction_coerces_boolean_away_from_integer_fields() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut event = InternalEvent::new(InternalEventKind::Lifecycle);
        event.payload = Some(json!({
            "event": "memory_compaction",
            "strategy": "summarize",
            "tokens_before": true,
            "compacted_count": 3,
        }));
        let result = handle_memory_checkpoint(&event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::MemoryCheckpoint(e) => {
                assert_eq!(e.checkpoint.strategy, MemoryCheckpointStrategy::Summarize);
                assert_eq!(e.checkpoint.tokens_before, None);
                assert_eq!(e.checkpoint.compacted_count, Some(3));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn non_compaction_lifecycle_payload_is_ignored() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut event = InternalEvent::new(InternalEventKind::Lifecycle);
        event.payload = Some(json!({"state": "cancelled"}));
        assert!(handle_memory_checkpoint(&event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }
}
