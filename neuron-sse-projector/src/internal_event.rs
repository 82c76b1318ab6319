use serde_json::Value;

/// Discriminates the five shapes an [`InternalEvent`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEventKind {
    /// A fine-grained provider streaming frame (`raw_type` names it).
    RawResponseEvent,
    /// A higher-level run-item lifecycle event (tool called/output/approval).
    RunItemStreamEvent,
    /// The active agent changed.
    AgentUpdatedStreamEvent,
    /// A service-level lifecycle signal (cancellation, memory compaction).
    Lifecycle,
    /// A service-level terminal error.
    Error,
}

/// The single input shape the projector consumes.
///
/// Every field except [`Self::kind`] is optional: upstream producers are
/// untrusted and the projector tolerates missing or wrong-shaped data by
/// treating it as absent rather than failing. `raw_event`/`payload`/`metadata`
/// stay as opaque [`serde_json::Value`] trees — see the crate docs on why
/// they are deliberately not modeled as strong types.
#[derive(Debug, Clone)]
pub struct InternalEvent {
    /// Which of the five shapes this event takes.
    pub kind: InternalEventKind,
    /// Fine-grained provider event name, present when `kind = RawResponseEvent`.
    pub raw_type: Option<String>,
    /// Opaque provider-native payload.
    pub raw_event: Option<Value>,
    /// Provider-assigned ordering hint, forwarded opaquely.
    pub sequence_number: Option<i64>,
    /// When present with `type = "agent_tool"`, routes this event to a nested sub-stream.
    pub scope: Option<Value>,
    /// Pre-extracted message text delta, for `response.output_text.delta` frames.
    pub text_delta: Option<String>,
    /// Pre-extracted reasoning-summary delta.
    pub reasoning_delta: Option<String>,
    /// Citation annotations attached to a text-annotation frame.
    pub annotations: Option<Vec<Value>>,
    /// Declarative tool-call snapshot used to merge aggregate tool state.
    pub tool_call: Option<Value>,
    /// Generic service-level payload, used by lifecycle/error events.
    pub payload: Option<Value>,
    /// Generic metadata map (agent-tool name sets, cancellation reasons, etc.).
    pub metadata: Option<Value>,
    /// Run-item's own event object, present when `kind = RunItemStreamEvent`.
    pub event: Option<Value>,
    /// Name of the run-item event (`tool_called`, `tool_output`, `mcp_approval_requested`).
    pub run_item_name: Option<String>,
    /// Provider type tag of the run item, used for tool-type heuristics.
    pub run_item_type: Option<String>,
    /// Identifier of the tool call this event concerns.
    pub tool_call_id: Option<String>,
    /// Name of the tool this event concerns.
    pub tool_name: Option<String>,
    /// Attachments to merge into the top-level attachment list.
    pub attachments: Option<Vec<Value>>,
    /// Assembled response text, present on the terminal input event.
    pub response_text: Option<String>,
    /// Structured output payload, present on the terminal input event.
    pub structured_output: Option<Value>,
    /// Token usage summary, present on the terminal input event.
    pub usage: Option<Value>,
    /// Whether this input event is the last one for its scope.
    pub is_terminal: bool,
    /// Name of the newly active agent, present when `kind = AgentUpdatedStreamEvent`.
    pub new_agent: Option<String>,
}

impl InternalEvent {
    /// Starts building an event of the given kind with every optional field unset.
    #[must_use]
    pub fn new(kind: InternalEventKind) -> Self {
        Self {
            kind,
            raw_type: None,
            raw_event: None,
            sequence_number: None,
            scope: None,
            text_delta: None,
            reasoning_delta: None,
            annotations: None,
            tool_call: None,
            payload: None,
            metadata: None,
            event: None,
            run_item_name: None,
            run_item_type: None,
            tool_call_id: None,
            tool_name: None,
            attachments: None,
            response_text: None,
            structured_output: None,
            usage: None,
            is_terminal: false,
            new_agent: None,
        }
    }

    /// Builds a `raw_response_event` with the given `raw_type` and payload.
    #[must_use]
    pub fn raw(raw_type: impl Into<String>, raw_event: Value) -> Self {
        Self {
            raw_event: Some(raw_event),
            raw_type: Some(raw_type.into()),
            ..Self::new(InternalEventKind::RawResponseEvent)
        }
    }
}
