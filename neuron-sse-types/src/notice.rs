use serde::{Deserialize, Serialize};

/// Kind of safety intervention a [`StreamNotice`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamNoticeType {
    /// A value was replaced because its key looked like a secret.
    Redacted,
    /// A string was cut short because it exceeded a length cap.
    Truncated,
}

/// A first-class marker attached to an event whenever the projector altered
/// content for safety or stability, carrying a dotted path to the affected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamNotice {
    /// What kind of intervention occurred.
    #[serde(rename = "type")]
    pub notice_type: StreamNoticeType,
    /// Dotted JSON path to the affected value, e.g. `"arguments_json.api_key"`.
    pub path: String,
    /// Human-readable explanation.
    pub message: String,
}

impl StreamNotice {
    /// Builds a `redacted` notice.
    #[must_use]
    pub fn redacted(path: impl Into<String>) -> Self {
        Self {
            notice_type: StreamNoticeType::Redacted,
            path: path.into(),
            message: "value redacted: key matched a sensitive-key pattern".to_string(),
        }
    }

    /// Builds a `truncated` notice.
    #[must_use]
    pub fn truncated(path: impl Into<String>, max_chars: usize) -> Self {
        Self {
            notice_type: StreamNoticeType::Truncated,
            path: path.into(),
            message: format!("value truncated to {max_chars} characters"),
        }
    }
}
