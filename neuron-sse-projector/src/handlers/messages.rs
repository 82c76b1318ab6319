use neuron_sse_types::{MessageDeltaEvent, PublicEvent};

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::item_scope_from_raw;
use crate::util::as_u32;

use super::HandlerCtx;

/// Forwards a single `response.output_text.delta` frame as `message.delta`,
/// without merging or splitting it.
pub(crate) fn handle_message_deltas(event: &InternalEvent, ctx: &mut HandlerCtx) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    if event.raw_type.as_deref() != Some("response.output_text.delta") {
        return Vec::new();
    }
    let Some(delta) = event.text_delta.clone() else {
        return Vec::new();
    };
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let Some((item_id, output_index)) = item_scope_from_raw(raw) else {
        return Vec::new();
    };
    let Some(content_index) = as_u32(raw, "content_index") else {
        return Vec::new();
    };

    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
    vec![PublicEvent::MessageDelta(MessageDeltaEvent { envelope, content_index, delta })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnvelopeBuilder;
    use crate::config::ProjectorConfig;
    use serde_json::json;

    fn ctx<'a>(builder: &'a EnvelopeBuilder<'a>, event_id: &'a mut u64, config: &'a ProjectorConfig) -> HandlerCtx<'a> {
        HandlerCtx { builder, event_id, config }
    }

    #[test]
    fn emits_message_delta_for_text_delta_frame() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut event = InternalEvent::raw(
            "response.output_text.delta",
            json!({"item_id": "msg_1", "output_index": 0, "content_index": 2}),
        );
        event.text_delta = Some("hello".to_string());
        let result = handle_message_deltas(&event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::MessageDelta(e) => {
                assert_eq!(e.delta, "hello");
                assert_eq!(e.content_index, 2);
                assert_eq!(e.envelope.item_id, "msg_1");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn missing_content_index_suppresses_event() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut event = InternalEvent::raw(
            "response.output_text.delta",
            json!({"item_id": "msg_1", "output_index": 0}),
        );
        event.text_delta = Some("hello".to_string());
        assert!(handle_message_deltas(&event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }

    #[test]
    fn non_matching_raw_type_yields_nothing() {
        let builder = EnvelopeBuilder::new("s", "c", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let event = InternalEvent::raw("response.created", json!({}));
        assert!(handle_message_deltas(&event, &mut ctx(&builder, &mut event_id, &config)).is_empty());
    }
}
