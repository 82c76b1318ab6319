use neuron_sse_types::{ErrorEvent, ErrorPayload, ErrorSource, PublicEvent};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::state::ProjectionState;
use crate::util::as_str;

use super::HandlerCtx;

/// Detects a terminal provider or service error and, if found, emits the
/// single `error` event and marks the scope terminal. May short-circuit the
/// rest of the handler chain by returning `Some`.
pub(crate) fn handle_terminal_errors(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Option<Vec<PublicEvent>> {
    let (source, code, message) = match event.kind {
        InternalEventKind::RawResponseEvent if event.raw_type.as_deref() == Some("error") => {
            let raw = event.raw_event.as_ref()?;
            let code = as_str(raw, "code").map(str::to_string);
            let message = as_str(raw, "message").unwrap_or("Provider error").to_string();
            (ErrorSource::Provider, code, message)
        }
        InternalEventKind::Error => {
            let payload = event.payload.as_ref();
            let message = payload
                .and_then(|p| as_str(p, "message"))
                .or_else(|| payload.and_then(|p| as_str(p, "error")))
                .unwrap_or("Server error")
                .to_string();
            (ErrorSource::Server, None, message)
        }
        _ => return None,
    };

    state.terminal_emitted = true;
    let envelope = ctx.builder.base(ctx.event_id, event.sequence_number, None);
    Some(vec![PublicEvent::Error(ErrorEvent {
        envelope,
        error: ErrorPayload {
            code,
            message,
            source,
            is_retryable: false,
        },
    })])
}
