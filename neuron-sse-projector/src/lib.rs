#![deny(missing_docs)]
//! Stateful translation layer from provider/agent-runtime streaming events to
//! `public_sse_v1`, the wire schema defined in [`neuron_sse_types`].
//!
//! A provider's own event stream is an implementation detail: its shape
//! changes across versions, varies by provider, and mixes transport-level
//! noise with the content a client actually needs. [`Projector`] sits between
//! that stream and the client-facing SSE transport, converting a sequence of
//! opaque [`InternalEvent`]s into a deterministic sequence of typed
//! [`neuron_sse_types::PublicEvent`]s, while absorbing upstream version
//! drift, tool-call bookkeeping, secret redaction, and large-payload chunking.
//!
//! # Design
//!
//! [`Projector::project`] is a pure function of its input event and the
//! projector's own accumulated state: it neither performs I/O nor blocks.
//! Callers own the transport; the projector only decides what to send over
//! it. Malformed or partial input is never an error — fields that cannot be
//! tolerantly coerced are treated as absent and the affected event is
//! suppressed rather than panicking or returning `Result`. See
//! [`ProjectorError`] for the narrow set of failures that *are* surfaced:
//! all of them are construction-time, caught when building a [`Projector`]
//! or [`ProjectorConfig`], never while projecting.
//!
//! Nested `agent_tool` sub-streams (an agent invoked as a tool by another
//! agent) get their own independent [`crate::state::ProjectionState`],
//! keyed by scope signature, so a sub-agent's tool calls and lifecycle never
//! collide with the top-level response's.
//!
//! # Logging
//!
//! Every dispatched event logs at [`tracing::trace!`]; suppressed or
//! malformed frames and forced-terminal transitions log at
//! [`tracing::warn!`]. This crate does not install a subscriber — callers
//! wire up `tracing-subscriber` or another collector themselves.

mod attachments;
mod builder;
mod chunk;
mod config;
mod error;
mod handlers;
mod internal_event;
mod projector;
mod sanitize;
mod scope;
mod state;
mod tooling;
mod util;

pub use config::ProjectorConfig;
pub use error::ProjectorError;
pub use internal_event::{InternalEvent, InternalEventKind};
pub use projector::Projector;
