use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{Envelope, ItemEnvelope};
use crate::tool::{ArgsToolType, PublicTool, ToolType};
use crate::usage::PublicUsage;
use crate::PublicCitation;

/// A provider-reported lifecycle status for the overall response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// The response has been accepted but has not started running.
    Queued,
    /// The response is actively running.
    InProgress,
    /// The response finished successfully.
    Completed,
    /// The response failed.
    Failed,
    /// The response ended without finishing (e.g. ran out of budget).
    Incomplete,
    /// The response was cancelled by the caller.
    Cancelled,
}

/// Strategy used for a memory-compaction checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCheckpointStrategy {
    /// Oldest turns were dropped to fit a budget.
    Compact,
    /// Oldest turns were replaced with a generated summary.
    Summarize,
    /// Turns were trimmed to a fixed count.
    Trim,
}

/// Payload describing a memory-compaction event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCheckpointPayload {
    /// Which compaction strategy ran.
    pub strategy: MemoryCheckpointStrategy,
    /// Why compaction triggered, if known.
    pub trigger_reason: Option<String>,
    /// Token count immediately before compaction.
    pub tokens_before: Option<u64>,
    /// Token count immediately after compaction.
    pub tokens_after: Option<u64>,
    /// Number of turns compacted.
    pub compacted_count: Option<u32>,
    /// Number of input messages compacted.
    pub compacted_inputs: Option<u32>,
    /// Number of output messages compacted.
    pub compacted_outputs: Option<u32>,
    /// Number of recent turns retained verbatim.
    pub keep_turns: Option<u32>,
    /// Turn-count threshold that triggered compaction.
    pub trigger_turns: Option<u32>,
    /// Whether tool inputs were cleared from retained turns.
    pub clear_tool_inputs: Option<bool>,
    /// Tool names excluded from clearing.
    pub excluded_tools: Option<Vec<String>>,
    /// Tool names included in clearing.
    pub included_tools: Option<Vec<String>>,
    /// Item count immediately before compaction.
    pub total_items_before: Option<u32>,
    /// Item count immediately after compaction.
    pub total_items_after: Option<u32>,
    /// Turn count immediately before compaction.
    pub turns_before: Option<u32>,
    /// Turn count immediately after compaction.
    pub turns_after: Option<u32>,
}

/// A file attached to the response, deduplicated by `object_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAttachment {
    /// Stable identifier used for deduplication.
    pub object_id: String,
    /// Original filename.
    pub filename: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Download URL.
    pub url: Option<String>,
    /// Tool call this attachment originated from, if any.
    pub tool_call_id: Option<String>,
    /// Size in bytes, if known.
    pub size_bytes: Option<u64>,
}

/// Source of a terminal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
    /// The error originated from the upstream model provider.
    Provider,
    /// The error originated from this service.
    Server,
}

/// Payload of a terminal `error` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Provider- or caller-supplied error code, if any.
    pub code: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// Where the error originated.
    pub source: ErrorSource,
    /// Whether the caller can reasonably retry the request.
    pub is_retryable: bool,
}

/// Final outcome status of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    /// The response finished successfully with content.
    Completed,
    /// The response failed.
    Failed,
    /// The response ended without producing content.
    Incomplete,
    /// The model declined to answer.
    Refused,
    /// The caller cancelled the response.
    Cancelled,
}

/// Terminal payload summarizing the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPayload {
    /// The computed outcome status. See the projector's final-status priority order.
    pub status: FinalStatus,
    /// Full assembled response text, if any.
    pub response_text: Option<String>,
    /// Structured output payload, if the response used one.
    pub structured_output: Option<Value>,
    /// Full accumulated reasoning summary text.
    pub reasoning_summary_text: Option<String>,
    /// Full refusal text, if the model refused.
    pub refusal_text: Option<String>,
    /// Deduplicated attachments collected over the response.
    pub attachments: Vec<MessageAttachment>,
    /// Token usage summary, if the provider reported one.
    pub usage: Option<PublicUsage>,
}

/// Which side of a chunked transfer a [`ChunkTarget`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkTargetKind {
    /// The chunked field belongs to a tool call.
    ToolCall,
    /// The chunked field belongs to a message.
    Message,
}

/// Transfer encoding used for a chunked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkEncoding {
    /// Chunk data is base64-encoded binary.
    Base64,
    /// Chunk data is raw UTF-8 text.
    Utf8,
}

/// Identifies the field a `chunk.delta`/`chunk.done` pair is transferring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkTarget {
    /// What kind of entity owns the chunked field.
    pub entity_kind: ChunkTargetKind,
    /// Identifier of that entity (a tool call id or an item id).
    pub entity_id: String,
    /// Name of the field being transferred, e.g. `"partial_image_b64"`.
    pub field: String,
    /// Disambiguates repeated chunked transfers of the same field, e.g.
    /// successive partial-image previews.
    pub part_index: Option<u32>,
}

/// Fixed `tool_type` discriminant for [`ToolApprovalEvent`], which only ever
/// concerns MCP tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolApprovalType {
    /// The only value this field takes today.
    Mcp,
}

macro_rules! define_events {
    (
        $(
            $(#[$variant_meta:meta])*
            $tag:literal => $variant:ident($struct_name:ident) {
                base: $base:ident,
                fields: { $($(#[$field_meta:meta])* $field:ident : $ty:ty),* $(,)? }
            }
        ),* $(,)?
    ) => {
        $(
            $(#[$variant_meta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct $struct_name {
                /// Envelope fields shared by every event.
                #[serde(flatten)]
                pub envelope: $base,
                $(
                    #[allow(missing_docs)]
                    $(#[$field_meta])*
                    pub $field: $ty,
                )*
            }
        )*

        /// Discriminated union of every event the projector can emit.
        ///
        /// Serialized as an internally tagged enum keyed by `kind`: the wire
        /// representation of any variant is a single flat JSON object, not a
        /// wrapper around a nested payload.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind")]
        pub enum PublicEvent {
            $(
                #[serde(rename = $tag)]
                $variant($struct_name),
            )*
        }
    };
}

define_events! {
    /// A top-level or scoped lifecycle transition.
    "lifecycle" => Lifecycle(LifecycleEvent) {
        base: Envelope,
        fields: { status: LifecycleStatus, reason: Option<String> }
    },
    /// A memory-compaction checkpoint occurred.
    "memory.checkpoint" => MemoryCheckpoint(MemoryCheckpointEvent) {
        base: Envelope,
        fields: { checkpoint: MemoryCheckpointPayload }
    },
    /// The active agent changed.
    "agent.updated" => AgentUpdated(AgentUpdatedEvent) {
        base: Envelope,
        fields: { from_agent: Option<String>, to_agent: String, handoff_index: Option<u32> }
    },
    /// A new output item appeared.
    "output_item.added" => OutputItemAdded(OutputItemAddedEvent) {
        base: ItemEnvelope,
        fields: { item_type: String, role: Option<String>, status: Option<String> }
    },
    /// An output item finished.
    "output_item.done" => OutputItemDone(OutputItemDoneEvent) {
        base: ItemEnvelope,
        fields: { item_type: String, role: Option<String>, status: Option<String> }
    },
    /// An incremental slice of message text.
    "message.delta" => MessageDelta(MessageDeltaEvent) {
        base: ItemEnvelope,
        fields: { content_index: u32, delta: String }
    },
    /// A citation attached to message text.
    "message.citation" => MessageCitation(MessageCitationEvent) {
        base: ItemEnvelope,
        fields: { content_index: u32, citation: PublicCitation }
    },
    /// An incremental slice of reasoning-summary text.
    "reasoning_summary.delta" => ReasoningSummaryDelta(ReasoningSummaryDeltaEvent) {
        base: ItemEnvelope,
        fields: { summary_index: Option<u32>, delta: String }
    },
    /// A new reasoning-summary part started.
    "reasoning_summary.part.added" => ReasoningSummaryPartAdded(ReasoningSummaryPartAddedEvent) {
        base: ItemEnvelope,
        fields: { summary_index: u32, part_type: String, text: Option<String> }
    },
    /// A reasoning-summary part finished.
    "reasoning_summary.part.done" => ReasoningSummaryPartDone(ReasoningSummaryPartDoneEvent) {
        base: ItemEnvelope,
        fields: { summary_index: u32, part_type: String, text: String }
    },
    /// An incremental slice of refusal text.
    "refusal.delta" => RefusalDelta(RefusalDeltaEvent) {
        base: ItemEnvelope,
        fields: { content_index: u32, delta: String }
    },
    /// The model's refusal text finished.
    "refusal.done" => RefusalDone(RefusalDoneEvent) {
        base: ItemEnvelope,
        fields: { content_index: u32, refusal_text: String }
    },
    /// A snapshot of a tool call's current status.
    "tool.status" => ToolStatus(ToolStatusEvent) {
        base: ItemEnvelope,
        fields: { tool: PublicTool }
    },
    /// An incremental slice of a tool call's arguments.
    "tool.arguments.delta" => ToolArgumentsDelta(ToolArgumentsDeltaEvent) {
        base: ItemEnvelope,
        fields: { tool_call_id: String, tool_type: ArgsToolType, tool_name: String, delta: String }
    },
    /// A tool call's arguments finished streaming.
    "tool.arguments.done" => ToolArgumentsDone(ToolArgumentsDoneEvent) {
        base: ItemEnvelope,
        fields: {
            tool_call_id: String,
            tool_type: ArgsToolType,
            tool_name: String,
            arguments_text: String,
            arguments_json: Option<Value>,
        }
    },
    /// An incremental slice of code-interpreter source code.
    "tool.code.delta" => ToolCodeDelta(ToolCodeDeltaEvent) {
        base: ItemEnvelope,
        fields: { tool_call_id: String, delta: String }
    },
    /// Code-interpreter source code finished streaming.
    "tool.code.done" => ToolCodeDone(ToolCodeDoneEvent) {
        base: ItemEnvelope,
        fields: { tool_call_id: String, code: String }
    },
    /// A tool call's output became available.
    "tool.output" => ToolOutput(ToolOutputEvent) {
        base: ItemEnvelope,
        fields: { tool_call_id: String, tool_type: ToolType, output: Value }
    },
    /// An MCP tool-call approval decision. Reserved: see design notes on
    /// why the projector does not currently construct this variant.
    "tool.approval" => ToolApproval(ToolApprovalEvent) {
        base: ItemEnvelope,
        fields: {
            tool_call_id: String,
            #[serde(rename = "tool_type")]
            tool_type_mcp: ToolApprovalType,
            tool_name: String,
            server_label: Option<String>,
            approval_request_id: Option<String>,
            approved: bool,
            reason: Option<String>,
        }
    },
    /// An incremental chunk of a large opaque field.
    "chunk.delta" => ChunkDelta(ChunkDeltaEvent) {
        base: ItemEnvelope,
        fields: { target: ChunkTarget, encoding: ChunkEncoding, chunk_index: u32, data: String }
    },
    /// The last chunk of a large opaque field was sent.
    "chunk.done" => ChunkDone(ChunkDoneEvent) {
        base: ItemEnvelope,
        fields: { target: ChunkTarget }
    },
    /// A terminal error ended the stream.
    "error" => Error(ErrorEvent) {
        base: Envelope,
        fields: { error: ErrorPayload }
    },
    /// The response finished, successfully or not.
    "final" => Final(FinalEvent) {
        base: Envelope,
        fields: { #[serde(rename = "final")] final_: FinalPayload }
    },
}
