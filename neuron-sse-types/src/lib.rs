#![deny(missing_docs)]
//! Wire schema for `public_sse_v1`, the client-facing event stream emitted by the
//! stream projector in [`neuron-sse-projector`].
//!
//! This crate has no logic: it is the typed shape of the envelope and the ~24
//! event variants the projector constructs. Splitting schema from projection
//! logic keeps the wire contract reusable by anything that needs to read or
//! replay public events (tests, a Python/TS client generator, a recorder)
//! without pulling in the projector's state machine.
//!
//! # Design
//!
//! [`PublicEvent`] is an internally tagged enum (`#[serde(tag = "kind")]`) so the
//! wire representation has the discriminator inline with the rest of the event's
//! fields rather than wrapped in an extra envelope layer. Each variant's struct
//! flattens a shared [`Envelope`]/[`ItemEnvelope`] for the common fields and then
//! declares exactly its own payload fields — no catch-all field, so the set of
//! keys a variant can carry is fixed by its declaration alone.
//!
//! [`neuron-sse-projector`]: https://docs.rs/neuron-sse-projector

mod citation;
mod envelope;
mod event;
mod notice;
mod tool;
mod usage;

pub use citation::{ContainerFileCitation, FileCitation, PublicCitation, UrlCitation};
pub use envelope::{Envelope, ItemEnvelope, SCHEMA_VERSION, StreamScope, WorkflowContext};
pub use event::{
    AgentUpdatedEvent, ChunkDeltaEvent, ChunkDoneEvent, ChunkTarget, ChunkTargetKind,
    ChunkEncoding, ErrorEvent, ErrorPayload, ErrorSource, FinalEvent, FinalPayload, FinalStatus,
    LifecycleEvent, LifecycleStatus, MemoryCheckpointEvent, MemoryCheckpointPayload,
    MemoryCheckpointStrategy, MessageAttachment, MessageCitationEvent, MessageDeltaEvent,
    OutputItemAddedEvent, OutputItemDoneEvent, PublicEvent, ReasoningSummaryDeltaEvent,
    ReasoningSummaryPartAddedEvent, ReasoningSummaryPartDoneEvent, RefusalDeltaEvent,
    RefusalDoneEvent, ToolApprovalEvent, ToolApprovalType, ToolArgumentsDeltaEvent,
    ToolArgumentsDoneEvent, ToolCodeDeltaEvent, ToolCodeDoneEvent, ToolOutputEvent,
    ToolStatusEvent,
};
pub use notice::{StreamNotice, StreamNoticeType};
pub use tool::{
    AgentTool, ArgsToolType, CodeInterpreterTool, CodeInterpreterStatus, FileSearchResult,
    FileSearchTool, FunctionTool, FunctionToolStatus, ImageGenerationStatus, ImageGenerationTool,
    McpTool, McpToolStatus, PublicTool, SearchStatus, ToolType, WebSearchTool,
};
pub use usage::PublicUsage;
