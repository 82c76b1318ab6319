//! Deduplicates message attachments by `object_id`, first insertion wins.

use neuron_sse_types::MessageAttachment;
use serde_json::Value;

use crate::state::ProjectionState;
use crate::util::as_str;

fn coerce_attachment(raw: &Value) -> Option<MessageAttachment> {
    let object_id = as_str(raw, "object_id")?.to_string();
    let filename = as_str(raw, "filename")?.to_string();
    Some(MessageAttachment {
        object_id,
        filename,
        mime_type: as_str(raw, "mime_type").map(str::to_string),
        url: as_str(raw, "url").map(str::to_string),
        tool_call_id: as_str(raw, "tool_call_id").map(str::to_string),
        size_bytes: raw.get("size_bytes").and_then(Value::as_u64),
    })
}

/// Merges any raw attachment maps carried by `raw_attachments` into the
/// top-level state's attachment list, skipping malformed entries and
/// duplicates of an already-seen `object_id`.
pub(crate) fn merge_attachments(state: &mut ProjectionState, raw_attachments: Option<&[Value]>) {
    let Some(raw_attachments) = raw_attachments else {
        return;
    };
    for raw in raw_attachments {
        let Some(attachment) = coerce_attachment(raw) else {
            continue;
        };
        if !state.seen_attachment_ids.insert(attachment.object_id.clone()) {
            continue;
        }
        state.attachments.push(attachment);
    }
}
