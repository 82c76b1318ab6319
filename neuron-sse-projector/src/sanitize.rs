//! Secret redaction and length truncation for arbitrary JSON trees.

use neuron_sse_types::StreamNotice;
use serde_json::Value;

const SENSITIVE_KEY_SUBSTRINGS: &[&str] = &[
    "api_key",
    "apikey",
    "authorization",
    "token",
    "secret",
    "password",
    "passphrase",
    "bearer",
    "client_secret",
    "access_token",
    "refresh_token",
    "id_token",
];

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_KEY_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

/// Truncates `value` to `max_chars` characters (counted as Unicode scalar
/// values, not bytes), returning the possibly-shortened string and a
/// [`StreamNotice`] if truncation occurred.
pub fn truncate_string(value: &str, path: &str, max_chars: usize) -> (String, Option<StreamNotice>) {
    let char_count = value.chars().count();
    if char_count <= max_chars {
        return (value.to_string(), None);
    }
    let truncated: String = value.chars().take(max_chars).collect();
    (truncated, Some(StreamNotice::truncated(path, max_chars)))
}

/// Recursively walks `value`, redacting object values whose key looks like a
/// secret and truncating strings longer than `max_string_chars`. Returns the
/// sanitized value alongside every notice produced, in traversal order.
pub fn sanitize_json(value: &Value, path: &str, max_string_chars: usize) -> (Value, Vec<StreamNotice>) {
    let mut notices = Vec::new();
    let sanitized = sanitize_inner(value, path, max_string_chars, &mut notices);
    (sanitized, notices)
}

fn sanitize_inner(value: &Value, path: &str, max_string_chars: usize, notices: &mut Vec<StreamNotice>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, v) in map {
                let child_path = join_path(path, key);
                if is_sensitive_key(key) {
                    notices.push(StreamNotice::redacted(child_path));
                    out.insert(key.clone(), Value::String("<redacted>".to_string()));
                } else {
                    out.insert(key.clone(), sanitize_inner(v, &child_path, max_string_chars, notices));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| sanitize_inner(v, &format!("{path}[{i}]"), max_string_chars, notices))
                .collect(),
        ),
        Value::String(s) => {
            let (truncated, notice) = truncate_string(s, path, max_string_chars);
            if let Some(notice) = notice {
                notices.push(notice);
            }
            Value::String(truncated)
        }
        other => other.clone(),
    }
}

fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuron_sse_types::StreamNoticeType;
    use serde_json::json;

    #[test]
    fn redacts_sensitive_keys_case_insensitively() {
        let value = json!({"API_Key": "sk-abc", "q": "hi"});
        let (sanitized, notices) = sanitize_json(&value, "", 4000);
        assert_eq!(sanitized["API_Key"], "<redacted>");
        assert_eq!(sanitized["q"], "hi");
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].notice_type, StreamNoticeType::Redacted);
        assert_eq!(notices[0].path, "API_Key");
    }

    #[test]
    fn redacts_nested_keys_with_dotted_path() {
        let value = json!({"auth": {"bearer_token": "xyz"}});
        let (_, notices) = sanitize_json(&value, "arguments_json", 4000);
        assert_eq!(notices[0].path, "arguments_json.auth.bearer_token");
    }

    #[test]
    fn truncates_long_strings_with_notice() {
        let value = json!({"q": "a".repeat(10)});
        let (sanitized, notices) = sanitize_json(&value, "", 5);
        assert_eq!(sanitized["q"], "aaaaa");
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].notice_type, StreamNoticeType::Truncated);
    }

    #[test]
    fn does_not_truncate_strings_within_limit() {
        let (result, notice) = truncate_string("hi", "path", 10);
        assert_eq!(result, "hi");
        assert!(notice.is_none());
    }

    #[test]
    fn redaction_wins_over_truncation_for_sensitive_long_values() {
        let value = json!({"secret": "a".repeat(100)});
        let (sanitized, notices) = sanitize_json(&value, "", 5);
        assert_eq!(sanitized["secret"], "<redacted>");
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn recurses_through_arrays() {
        let value = json!({"items": [{"token": "t1"}, {"token": "t2"}]});
        let (_, notices) = sanitize_json(&value, "", 4000);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].path, "items[0].token");
        assert_eq!(notices[1].path, "items[1].token");
    }

    #[test]
    fn leaves_non_sensitive_scalars_untouched() {
        let value = json!({"count": 3, "ok": true, "name": null});
        let (sanitized, notices) = sanitize_json(&value, "", 4000);
        assert_eq!(sanitized, value);
        assert!(notices.is_empty());
    }
}
