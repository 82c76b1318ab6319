//! Allocates monotonic event ids and stamps the common envelope fields.

use neuron_sse_types::{Envelope, ItemEnvelope, StreamNotice, StreamScope, WorkflowContext, SCHEMA_VERSION};

use crate::util::now_iso;

/// Request-scoped identity forwarded onto every envelope built during one
/// [`crate::Projector::project`] call.
pub struct EnvelopeBuilder<'a> {
    /// Identifier of the SSE stream.
    pub stream_id: &'a str,
    /// Identifier of the conversation.
    pub conversation_id: &'a str,
    /// Identifier of the underlying provider response, if one exists yet.
    pub response_id: Option<&'a str>,
    /// Name of the agent producing events in this call.
    pub agent: Option<&'a str>,
    /// Workflow context, if this response runs inside a workflow.
    pub workflow: Option<&'a WorkflowContext>,
    /// Nested sub-stream scope, if this call is projecting into one.
    pub scope: Option<&'a StreamScope>,
    /// Timestamp to stamp onto every envelope built in this call. Fixed for
    /// the duration of one `project()` call so that every event produced by
    /// a single input frame carries an identical timestamp.
    pub server_timestamp: String,
}

impl<'a> EnvelopeBuilder<'a> {
    /// Builds a new builder, defaulting the timestamp to the current instant
    /// when the caller did not supply one.
    #[must_use]
    pub fn new(
        stream_id: &'a str,
        conversation_id: &'a str,
        response_id: Option<&'a str>,
        agent: Option<&'a str>,
        workflow: Option<&'a WorkflowContext>,
        scope: Option<&'a StreamScope>,
        server_timestamp: Option<String>,
    ) -> Self {
        Self {
            stream_id,
            conversation_id,
            response_id,
            agent,
            workflow,
            scope,
            server_timestamp: server_timestamp.unwrap_or_else(now_iso),
        }
    }

    /// Builds the common envelope, allocating the next event id from `event_id`.
    pub fn base(
        &self,
        event_id: &mut u64,
        provider_sequence_number: Option<i64>,
        notices: Option<Vec<StreamNotice>>,
    ) -> Envelope {
        *event_id += 1;
        Envelope {
            schema: SCHEMA_VERSION.to_string(),
            event_id: *event_id,
            stream_id: self.stream_id.to_string(),
            server_timestamp: self.server_timestamp.clone(),
            conversation_id: self.conversation_id.to_string(),
            response_id: self.response_id.map(str::to_string),
            agent: self.agent.map(str::to_string),
            workflow: self.workflow.cloned(),
            scope: self.scope.cloned(),
            provider_sequence_number,
            notices: notices.filter(|n| !n.is_empty()),
        }
    }

    /// Builds an item-scoped envelope, stamping `item_id`/`output_index` atop [`Self::base`].
    pub fn item(
        &self,
        event_id: &mut u64,
        item_id: impl Into<String>,
        output_index: u32,
        provider_sequence_number: Option<i64>,
        notices: Option<Vec<StreamNotice>>,
    ) -> ItemEnvelope {
        ItemEnvelope {
            envelope: self.base(event_id, provider_sequence_number, notices),
            item_id: item_id.into(),
            output_index,
        }
    }
}
