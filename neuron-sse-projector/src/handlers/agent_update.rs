use neuron_sse_types::{AgentUpdatedEvent, PublicEvent};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::state::ProjectionState;

use super::HandlerCtx;

/// Emits `agent.updated` when the active agent changes, incrementing the
/// per-scope handoff counter.
pub(crate) fn handle_agent_update(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::AgentUpdatedStreamEvent {
        return Vec::new();
    }
    let Some(new_agent) = event.new_agent.clone() else {
        return Vec::new();
    };
    if state.current_agent.as_deref() == Some(new_agent.as_str()) {
        return Vec::new();
    }

    let from_agent = state.current_agent.clone();
    state.handoff_count += 1;
    state.current_agent = Some(new_agent.clone());

    let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
    vec![PublicEvent::AgentUpdated(AgentUpdatedEvent {
        envelope,
        from_agent,
        to_agent: new_agent,
        handoff_index: Some(state.handoff_count),
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnvelopeBuilder;
    use crate::config::ProjectorConfig;

    fn ctx<'a>(builder: &'a EnvelopeBuilder<'a>, event_id: &'a mut u64, config: &'a ProjectorConfig) -> HandlerCtx<'a> {
        HandlerCtx { builder, event_id, config }
    }

    #[test]
    fn first_agent_handoff_has_no_from_agent() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut event = InternalEvent::new(InternalEventKind::AgentUpdatedStreamEvent);
        event.new_agent = Some("Researcher".to_string());
        let result = handle_agent_update(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::AgentUpdated(e) => {
                assert_eq!(e.from_agent, None);
                assert_eq!(e.to_agent, "Researcher");
                assert_eq!(e.handoff_index, Some(1));
            }
            _ => panic!(),
        }
        assert_eq!(state.current_agent.as_deref(), Some("Researcher"));
        assert_eq!(state.handoff_count, 1);
    }

    #[test]
    fn repeating_the_same_agent_is_a_no_op() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.current_agent = Some("Researcher".to_string());
        let mut event = InternalEvent::new(InternalEventKind::AgentUpdatedStreamEvent);
        event.new_agent = Some("Researcher".to_string());
        assert!(handle_agent_update(&mut state, &event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
        assert_eq!(state.handoff_count, 0);
    }

    #[test]
    fn second_handoff_increments_counter_and_records_from_agent() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        state.current_agent = Some("Researcher".to_string());
        state.handoff_count = 1;
        let mut event = InternalEvent::new(InternalEventKind::AgentUpdatedStreamEvent);
        event.new_agent = Some("Writer".to_string());
        let result = handle_agent_update(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::AgentUpdated(e) => {
                assert_eq!(e.from_agent.as_deref(), Some("Researcher"));
                assert_eq!(e.handoff_index, Some(2));
            }
            _ => panic!(),
        }
    }
}
