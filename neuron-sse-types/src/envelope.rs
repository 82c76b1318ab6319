use serde::{Deserialize, Serialize};

use crate::notice::StreamNotice;

/// The literal, constant schema version stamped onto every emitted event.
pub const SCHEMA_VERSION: &str = "public_sse_v1";

/// Workflow metadata forwarded from the caller onto every envelope, when the
/// response is running inside a named workflow rather than a bare agent turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowContext {
    /// Stable identifier of the workflow definition.
    pub workflow_key: String,
    /// Identifier of this particular workflow run.
    pub workflow_run_id: String,
    /// Name of the stage currently executing, if the workflow is staged.
    pub stage_name: Option<String>,
    /// Name of the step currently executing within the stage.
    pub step_name: Option<String>,
    /// Name of the agent assigned to the current step.
    pub step_agent: Option<String>,
    /// Name of the parallel branch group, for fan-out steps.
    pub parallel_group: Option<String>,
    /// Index of this branch within its parallel group.
    pub branch_index: Option<i64>,
}

/// Identifies a nested sub-stream. Currently the only scope kind is an
/// agent-as-tool invocation; the type tag is kept explicit rather than
/// collapsed so the schema can grow new scope kinds without a breaking change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamScope {
    /// Discriminator, always `"agent_tool"` today.
    #[serde(rename = "type")]
    pub scope_type: String,
    /// The tool call this sub-stream is nested under.
    pub tool_call_id: String,
    /// Name of the nested tool, if known at scope-creation time.
    pub tool_name: Option<String>,
    /// Name of the nested agent, if known at scope-creation time.
    pub agent: Option<String>,
}

impl StreamScope {
    /// Builds an `agent_tool` scope.
    #[must_use]
    pub fn agent_tool(tool_call_id: impl Into<String>) -> Self {
        Self {
            scope_type: "agent_tool".to_string(),
            tool_call_id: tool_call_id.into(),
            tool_name: None,
            agent: None,
        }
    }

    /// The scope's signature, used as the key into the projector's scoped
    /// state map (`"{type}:{tool_call_id}"`).
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}:{}", self.scope_type, self.tool_call_id)
    }
}

/// Fields shared by every `PublicEvent` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Constant schema discriminator, always [`SCHEMA_VERSION`].
    pub schema: String,
    /// Monotonically increasing identifier, unique within one stream.
    pub event_id: u64,
    /// Opaque identifier of the overall SSE stream.
    pub stream_id: String,
    /// RFC-3339 UTC timestamp with a literal `Z` suffix.
    pub server_timestamp: String,
    /// Identifier of the conversation this stream belongs to.
    pub conversation_id: String,
    /// Identifier of the underlying provider response, if one exists yet.
    pub response_id: Option<String>,
    /// Name of the agent producing this event, if known.
    pub agent: Option<String>,
    /// Workflow context, if this response runs inside a workflow.
    pub workflow: Option<WorkflowContext>,
    /// Nested sub-stream scope, if this event belongs to one.
    pub scope: Option<StreamScope>,
    /// Provider-assigned ordering hint, forwarded opaquely.
    pub provider_sequence_number: Option<i64>,
    /// Redaction/truncation notices attached to this event, if any were produced.
    pub notices: Option<Vec<StreamNotice>>,
}

/// Envelope for item-scoped variants: adds the output item's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEnvelope {
    /// The shared envelope fields.
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Identifier of the output item this event belongs to.
    pub item_id: String,
    /// Position of the item within `response.output[]`.
    pub output_index: u32,
}
