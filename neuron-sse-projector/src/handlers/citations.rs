use neuron_sse_types::{ContainerFileCitation, FileCitation, MessageCitationEvent, PublicCitation, PublicEvent, UrlCitation};
use serde_json::Value;

use crate::internal_event::{InternalEvent, InternalEventKind};
use crate::scope::{item_scope_from_raw, tool_scope};
use crate::state::ProjectionState;
use crate::util::as_u32;

use super::HandlerCtx;

fn build_url_citation(annotation: &Value) -> Option<PublicCitation> {
    Some(PublicCitation::Url(UrlCitation {
        start_index: as_u32(annotation, "start_index")?,
        end_index: as_u32(annotation, "end_index")?,
        title: annotation.get("title").and_then(Value::as_str).map(str::to_string),
        url: annotation.get("url").and_then(Value::as_str)?.to_string(),
    }))
}

fn build_container_file_citation(annotation: &Value, conversation_id: &str) -> Option<PublicCitation> {
    let container_id = annotation.get("container_id").and_then(Value::as_str)?.to_string();
    let file_id = annotation.get("file_id").and_then(Value::as_str)?.to_string();
    let filename = annotation.get("filename").and_then(Value::as_str).map(str::to_string);
    let url = annotation.get("url").and_then(Value::as_str).map(str::to_string).or_else(|| {
        let mut qs = format!("conversation_id={conversation_id}");
        if let Some(name) = &filename {
            qs.push_str(&format!("&filename={name}"));
        }
        Some(format!("/api/v1/openai/containers/{container_id}/files/{file_id}/download?{qs}"))
    });
    Some(PublicCitation::ContainerFile(ContainerFileCitation {
        start_index: as_u32(annotation, "start_index")?,
        end_index: as_u32(annotation, "end_index")?,
        container_id,
        file_id,
        filename,
        url,
    }))
}

fn build_file_citation(annotation: &Value) -> Option<PublicCitation> {
    Some(PublicCitation::File(FileCitation {
        start_index: as_u32(annotation, "start_index"),
        end_index: as_u32(annotation, "end_index"),
        index: as_u32(annotation, "index"),
        file_id: annotation.get("file_id").and_then(Value::as_str)?.to_string(),
        filename: annotation.get("filename").and_then(Value::as_str).map(str::to_string),
    }))
}

fn reannounce_web_search_source(state: &mut ProjectionState, url: &str, ctx: &mut HandlerCtx, sequence_number: Option<i64>) -> Option<PublicEvent> {
    let tool_call_id = state.last_web_search_tool_call_id.clone()?;
    let tool_state = state.tool_state.get_mut(&tool_call_id)?;
    if tool_state.sources.iter().any(|s| s == url) {
        return None;
    }
    tool_state.sources.push(url.to_string());
    let (item_id, output_index) = tool_scope(&tool_call_id, tool_state, None)?;
    let tool = tool_state.to_public_tool(&tool_call_id);
    let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, sequence_number, None);
    Some(PublicEvent::ToolStatus(neuron_sse_types::ToolStatusEvent { envelope, tool }))
}

/// Translates `response.output_text.annotation.added` frames into
/// `message.citation` events, additionally re-announcing a web-search tool's
/// source list when a new URL citation references it.
pub(crate) fn handle_citations(
    state: &mut ProjectionState,
    event: &InternalEvent,
    ctx: &mut HandlerCtx,
) -> Vec<PublicEvent> {
    if event.kind != InternalEventKind::RawResponseEvent {
        return Vec::new();
    }
    if event.raw_type.as_deref() != Some("response.output_text.annotation.added") {
        return Vec::new();
    }
    let Some(raw) = event.raw_event.as_ref() else {
        return Vec::new();
    };
    let message_scope = item_scope_from_raw(raw);
    let conversation_id = ctx.builder.conversation_id.to_string();

    let mut out = Vec::new();
    for annotation in event.annotations.iter().flatten() {
        let Some(ann_type) = annotation.get("type").and_then(Value::as_str) else {
            continue;
        };
        let citation = match ann_type {
            "url_citation" => build_url_citation(annotation),
            "container_file_citation" => build_container_file_citation(annotation, &conversation_id),
            "file_citation" => build_file_citation(annotation),
            _ => None,
        };
        let Some(citation) = citation else {
            continue;
        };

        if let PublicCitation::Url(url_citation) = &citation {
            if let Some(reannounce) = reannounce_web_search_source(state, &url_citation.url, ctx, event.sequence_number) {
                out.push(reannounce);
            }
        }

        if let (Some((item_id, output_index)), Some(content_index)) =
            (message_scope.clone(), as_u32(annotation, "content_index"))
        {
            let envelope = ctx.builder.item(ctx.event_id, item_id, output_index, event.sequence_number, None);
            out.push(PublicEvent::MessageCitation(MessageCitationEvent { envelope, content_index, citation }));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnvelopeBuilder;
    use crate::config::ProjectorConfig;
    use crate::state::ToolState;
    use neuron_sse_types::ToolType;
    use serde_json::json;

    fn ctx<'a>(builder: &'a EnvelopeBuilder<'a>, event_id: &'a mut u64, config: &'a ProjectorConfig) -> HandlerCtx<'a> {
        HandlerCtx { builder, event_id, config }
    }

    #[test]
    fn url_citation_reannounces_web_search_source() {
        let builder = EnvelopeBuilder::new("s", "conv_1", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut tool_state = ToolState::new(ToolType::WebSearch);
        tool_state.output_index = Some(0);
        state.tool_state.insert("ws_1".to_string(), tool_state);
        state.last_web_search_tool_call_id = Some("ws_1".to_string());

        let mut event = InternalEvent::raw(
            "response.output_text.annotation.added",
            json!({"item_id": "msg_1", "output_index": 2}),
        );
        event.annotations = Some(vec![json!({
            "type": "url_citation", "start_index": 0, "end_index": 5,
            "url": "https://x.example", "content_index": 0,
        })]);

        let result = handle_citations(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert_eq!(result.len(), 2);
        assert!(matches!(result[0], PublicEvent::ToolStatus(_)));
        assert!(matches!(result[1], PublicEvent::MessageCitation(_)));
        assert_eq!(state.tool_state["ws_1"].sources, vec!["https://x.example".to_string()]);
    }

    #[test]
    fn container_file_citation_synthesizes_url_when_missing() {
        let builder = EnvelopeBuilder::new("s", "conv_1", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut event = InternalEvent::raw(
            "response.output_text.annotation.added",
            json!({"item_id": "msg_1", "output_index": 0}),
        );
        event.annotations = Some(vec![json!({
            "type": "container_file_citation", "start_index": 0, "end_index": 4,
            "container_id": "cont_1", "file_id": "file_1", "filename": "report.pdf",
            "content_index": 1,
        })]);
        let result = handle_citations(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        match &result[0] {
            PublicEvent::MessageCitation(e) => match &e.citation {
                PublicCitation::ContainerFile(c) => {
                    assert_eq!(
                        c.url.as_deref(),
                        Some("/api/v1/openai/containers/cont_1/files/file_1/download?conversation_id=conv_1&filename=report.pdf")
                    );
                }
                other => panic!("expected container file citation, got {other:?}"),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn duplicate_url_citation_does_not_reannounce() {
        let builder = EnvelopeBuilder::new("s", "conv_1", None, None, None, None, Some("t".to_string()));
        let mut event_id = 0;
        let config = ProjectorConfig::default();
        let mut state = ProjectionState::new();
        let mut tool_state = ToolState::new(ToolType::WebSearch);
        tool_state.output_index = Some(0);
        tool_state.sources = vec!["https://x.example".to_string()];
        state.tool_state.insert("ws_1".to_string(), tool_state);
        state.last_web_search_tool_call_id = Some("ws_1".to_string());

        let mut event = InternalEvent::raw("response.output_text.annotation.added", json!({}));
        event.annotations = Some(vec![json!({
            "type": "url_citation", "start_index": 0, "end_index": 5, "url": "https://x.example",
        })]);
        let result = handle_citations(&mut state, &event, &mut ctx(&builder, &mut event_id, &config));
        assert!(result.is_empty());
    }
}
