//! The stateful façade translating one provider/runtime event stream into
//! the public wire schema.

use std::collections::HashMap;

use neuron_sse_types::{
    ErrorEvent, ErrorPayload, ErrorSource, FinalEvent, FinalPayload, FinalStatus, LifecycleStatus,
    PublicEvent, PublicUsage,
};
use serde_json::Value;
use uuid::Uuid;
use tracing::{trace, warn};

use crate::attachments::merge_attachments;
use crate::builder::EnvelopeBuilder;
use crate::config::ProjectorConfig;
use crate::error::ProjectorError;
use crate::handlers::{
    handle_agent_update, handle_citations, handle_code_interpreter, handle_memory_checkpoint,
    handle_message_deltas, handle_output_items, handle_reasoning_summary, handle_refusal,
    handle_response_lifecycle, handle_run_item, handle_service_lifecycle, handle_terminal_errors,
    handle_tool_arguments, handle_tool_call_updates, handle_tool_status_raw, HandlerCtx,
};
use crate::internal_event::InternalEvent;
use crate::state::ProjectionState;
use crate::util::{stream_scope_from_raw, workflow_context_from_meta};

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Translates a stream of [`InternalEvent`]s into the public
/// [`PublicEvent`] schema, one instance per SSE stream.
///
/// An instance owns the top-level response's [`ProjectionState`] plus one
/// more per nested `agent_tool` sub-stream, keyed by
/// [`neuron_sse_types::StreamScope::signature`]. It is `Send` but not
/// `Sync`: callers running multiple streams concurrently use one instance
/// per stream rather than sharing one across threads.
pub struct Projector {
    stream_id: String,
    config: ProjectorConfig,
    event_id: u64,
    state: ProjectionState,
    scoped_states: HashMap<String, ProjectionState>,
}

impl Projector {
    /// Builds a projector for a fresh stream, minting a `stream_id` of the
    /// form `"{prefix}_{32 hex chars}"` from a random v4 UUID.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectorError::InvalidStreamIdPrefix`] if `stream_id_prefix`
    /// is empty or contains a character outside `[A-Za-z0-9_-]`, or
    /// [`ProjectorError::InvalidConfig`] if `config` carries a zero-valued
    /// threshold.
    pub fn new(stream_id_prefix: &str, config: ProjectorConfig) -> Result<Self, ProjectorError> {
        if !is_valid_prefix(stream_id_prefix) {
            return Err(ProjectorError::InvalidStreamIdPrefix(stream_id_prefix.to_string()));
        }
        let config = config.validated()?;
        Ok(Self {
            stream_id: format!("{stream_id_prefix}_{}", Uuid::new_v4().simple()),
            config,
            event_id: 0,
            state: ProjectionState::new(),
            scoped_states: HashMap::new(),
        })
    }

    /// The stream id minted for this instance.
    #[must_use]
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    fn final_status(state: &ProjectionState, event: &InternalEvent) -> FinalStatus {
        if !state.refusal_text.is_empty() {
            return FinalStatus::Refused;
        }
        match state.lifecycle_status {
            Some(LifecycleStatus::Failed) => return FinalStatus::Failed,
            Some(LifecycleStatus::Incomplete) => return FinalStatus::Incomplete,
            Some(LifecycleStatus::Cancelled) => return FinalStatus::Cancelled,
            _ => {}
        }
        if event.response_text.is_none() && event.structured_output.is_none() {
            return FinalStatus::Incomplete;
        }
        FinalStatus::Completed
    }

    /// Projects one internal event into zero or more public events.
    ///
    /// Runs a fixed dispatch, in this exact order:
    ///
    /// 1. merges any carried attachments into the top-level state,
    ///    regardless of this event's own scope;
    /// 2. resolves this event's scope — top-level, or a nested `agent_tool`
    ///    sub-stream addressed by `event.scope`;
    /// 3. the agent-update handler;
    /// 4. the raw-event handler chain, in its fixed sub-order (terminal
    ///    error detection first, which may short-circuit the rest);
    /// 5. the run-item handler;
    /// 6. if this event is unscoped and `event.is_terminal`, the `final` event.
    ///
    /// Once the top-level stream's terminal event (`final` or `error`) has
    /// been emitted, every later call returns an empty vector.
    #[allow(clippy::too_many_arguments)]
    pub fn project(
        &mut self,
        event: &InternalEvent,
        conversation_id: &str,
        response_id: Option<&str>,
        agent: Option<&str>,
        workflow_meta: Option<&Value>,
        server_timestamp: Option<String>,
    ) -> Vec<PublicEvent> {
        if self.state.terminal_emitted {
            return Vec::new();
        }

        merge_attachments(&mut self.state, event.attachments.as_deref());

        let scope = event.scope.as_ref().and_then(stream_scope_from_raw);
        let workflow = workflow_meta.and_then(workflow_context_from_meta);
        let builder = EnvelopeBuilder::new(
            &self.stream_id,
            conversation_id,
            response_id,
            agent,
            workflow.as_ref(),
            scope.as_ref(),
            server_timestamp,
        );

        let Projector { event_id, state, scoped_states, config, .. } = self;
        let config = *config;
        let active_state: &mut ProjectionState = match &scope {
            Some(scope) => scoped_states.entry(scope.signature()).or_insert_with(ProjectionState::new),
            None => state,
        };

        let mut ctx = HandlerCtx { builder: &builder, event_id, config: &config };
        let mut out = Vec::new();

        out.extend(handle_agent_update(active_state, event, &mut ctx));

        if let Some(error_events) = handle_terminal_errors(active_state, event, &mut ctx) {
            warn!(raw_type = ?event.raw_type, scope = ?scope.as_ref().map(|s| s.signature()), "terminal error observed, suppressing remaining handlers");
            out.extend(error_events);
            return out;
        }
        out.extend(handle_tool_call_updates(active_state, event, &mut ctx));
        out.extend(handle_response_lifecycle(active_state, event, &mut ctx));
        out.extend(handle_service_lifecycle(active_state, event, &mut ctx));
        out.extend(handle_memory_checkpoint(event, &mut ctx));
        out.extend(handle_output_items(active_state, event, &mut ctx));
        out.extend(handle_message_deltas(event, &mut ctx));
        out.extend(handle_citations(active_state, event, &mut ctx));
        out.extend(handle_reasoning_summary(active_state, event, &mut ctx));
        out.extend(handle_refusal(active_state, event, &mut ctx));
        out.extend(handle_tool_status_raw(active_state, event, &mut ctx));
        out.extend(handle_code_interpreter(event, &mut ctx));
        out.extend(handle_tool_arguments(active_state, event, &mut ctx));

        out.extend(handle_run_item(active_state, event, &mut ctx));

        if scope.is_none() && event.is_terminal {
            let status = Self::final_status(active_state, event);
            let usage = event.usage.clone().and_then(|v| serde_json::from_value::<PublicUsage>(v).ok());
            let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
            active_state.terminal_emitted = true;
            out.push(PublicEvent::Final(FinalEvent {
                envelope,
                final_: FinalPayload {
                    status,
                    response_text: event.response_text.clone(),
                    structured_output: event.structured_output.clone(),
                    reasoning_summary_text: (!active_state.reasoning_summary_text.is_empty())
                        .then(|| active_state.reasoning_summary_text.clone()),
                    refusal_text: (!active_state.refusal_text.is_empty())
                        .then(|| active_state.refusal_text.clone()),
                    attachments: active_state.attachments.clone(),
                    usage,
                },
            }));
        }

        trace!(
            raw_type = ?event.raw_type,
            scope = ?scope.as_ref().map(|s| s.signature()),
            emitted = out.len(),
            "projected raw event"
        );
        out
    }

    /// Unconditionally ends the stream with a single `error` event.
    ///
    /// Sets `terminal_emitted` on the top-level state so that every
    /// subsequent [`Self::project`] call returns an empty vector. Callers
    /// invoke this directly in response to an out-of-band failure (a
    /// transport error, a timeout) rather than through the ordinary
    /// `InternalEvent` stream, so unlike `project` it does not check
    /// `terminal_emitted` before running: it always builds and returns its
    /// event.
    #[allow(clippy::too_many_arguments)]
    pub fn project_error(
        &mut self,
        conversation_id: &str,
        response_id: Option<&str>,
        agent: Option<&str>,
        workflow_meta: Option<&Value>,
        code: Option<String>,
        message: String,
        source: ErrorSource,
        is_retryable: bool,
        server_timestamp: Option<String>,
    ) -> PublicEvent {
        let workflow = workflow_meta.and_then(workflow_context_from_meta);
        let builder = EnvelopeBuilder::new(
            &self.stream_id,
            conversation_id,
            response_id,
            agent,
            workflow.as_ref(),
            None,
            server_timestamp,
        );
        let envelope = builder.base(&mut self.event_id, None, None);
        self.state.terminal_emitted = true;
        warn!(code = ?code, source = ?source, "projector forced into terminal error state");
        PublicEvent::Error(ErrorEvent {
            envelope,
            error: ErrorPayload { code, message, source, is_retryable },
        })
    }
}
