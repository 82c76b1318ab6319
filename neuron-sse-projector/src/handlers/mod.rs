//! One module per raw-event family, dispatched in the fixed order documented
//! on [`crate::Projector::project`].

mod agent_update;
mod citations;
mod code_interpreter;
mod errors;
mod lifecycle;
mod messages;
mod output_items;
mod reasoning;
mod refusal;
mod run_items;
mod tool_arguments;
mod tool_call_updates;
mod tool_status_raw;

pub(crate) use agent_update::handle_agent_update;
pub(crate) use citations::handle_citations;
pub(crate) use code_interpreter::handle_code_interpreter;
pub(crate) use errors::handle_terminal_errors;
pub(crate) use lifecycle::{handle_memory_checkpoint, handle_response_lifecycle, handle_service_lifecycle};
pub(crate) use messages::handle_message_deltas;
pub(crate) use output_items::handle_output_items;
pub(crate) use reasoning::handle_reasoning_summary;
pub(crate) use refusal::handle_refusal;
pub(crate) use run_items::handle_run_item;
pub(crate) use tool_arguments::handle_tool_arguments;
pub(crate) use tool_call_updates::handle_tool_call_updates;
pub(crate) use tool_status_raw::handle_tool_status_raw;

use crate::builder::EnvelopeBuilder;
use crate::config::ProjectorConfig;

/// Shared, per-call context threaded through every handler: the envelope
/// builder, the top-level monotonic event-id counter, and the resolved config.
pub(crate) struct HandlerCtx<'a> {
    pub builder: &'a EnvelopeBuilder<'a>,
    pub event_id: &'a mut u64,
    pub config: &'a ProjectorConfig,
}
