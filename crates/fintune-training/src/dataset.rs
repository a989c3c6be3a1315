//! Record schema and validation for SFT-style conversational datasets.
//!
//! A record is one labeled example: a JSON object with a `messages` array of
//! role/content pairs. Records arrive as raw `serde_json::Value`s (one per
//! JSONL line) and stay that way until they pass validation, since a bad line
//! may be any JSON shape at all.

use serde::{Deserialize, Serialize};

/// A raw record as decoded from one JSONL line. May be any JSON value;
/// only [`is_valid_record`] decides whether it is usable.
pub type RawRecord = serde_json::Value;

/// Roles accepted in a conversational message.
pub const ALLOWED_ROLES: [&str; 3] = ["system", "user", "assistant"];

/// Key holding the message sequence in a record.
pub const MESSAGES_KEY: &str = "messages";

/// Optional structured key carrying account context, preferred over the
/// legacy in-message marker scrape (see the workflow crate).
pub const ACCOUNT_INFO_KEY: &str = "account_info";

/// A single message of a training record, for authoring and typed access
/// after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMessage {
    /// The role of the message sender ("system", "user" or "assistant").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

/// Builds a raw record from typed messages, for authoring fixtures and
/// structured data sources.
#[must_use]
pub fn record_from_messages(messages: &[RecordMessage]) -> RawRecord {
    serde_json::json!({ "messages": messages })
}

/// Decides whether one raw record conforms to the conversational-message
/// schema required for fine-tuning.
///
/// Pure, total and deterministic: never fails, never mutates, always answers.
/// Rules are applied in order with short-circuit on the first violation:
///
/// 1. the record is a JSON object;
/// 2. it contains a `messages` array with at least 2 elements;
/// 3. every message is an object with both `role` and `content` keys;
/// 4. every `role` is one of `system`, `user`, `assistant`.
#[must_use]
pub fn is_valid_record(record: &RawRecord) -> bool {
    let Some(object) = record.as_object() else {
        return false;
    };

    let Some(messages) = object.get(MESSAGES_KEY).and_then(|v| v.as_array()) else {
        return false;
    };
    if messages.len() < 2 {
        return false;
    }

    for message in messages {
        let Some(message) = message.as_object() else {
            return false;
        };
        if !message.contains_key("content") {
            return false;
        }
        let Some(role) = message.get("role").and_then(|v| v.as_str()) else {
            return false;
        };
        if !ALLOWED_ROLES.contains(&role) {
            return false;
        }
    }

    true
}

/// Returns the content of the first `user`-role message of a record, if any.
///
/// Callers are expected to use this only on records that passed validation,
/// but the function itself tolerates any shape.
#[must_use]
pub fn first_user_message(record: &RawRecord) -> Option<&str> {
    record
        .get(MESSAGES_KEY)?
        .as_array()?
        .iter()
        .find(|m| m.get("role").and_then(|r| r.as_str()) == Some("user"))?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> RawRecord {
        json!({
            "messages": [
                {"role": "system", "content": "你是一个专业的金融助手"},
                {"role": "user", "content": "如何理财？"},
                {"role": "assistant", "content": "建议分散投资。"}
            ]
        })
    }

    #[test]
    fn test_valid_record_accepted() {
        assert!(is_valid_record(&valid_record()));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(!is_valid_record(&json!(["not", "an", "object"])));
        assert!(!is_valid_record(&json!("scalar")));
        assert!(!is_valid_record(&json!(42)));
        assert!(!is_valid_record(&json!(null)));
    }

    #[test]
    fn test_missing_or_short_messages_rejected() {
        assert!(!is_valid_record(&json!({"data": []})));
        assert!(!is_valid_record(&json!({"messages": "nope"})));
        assert!(!is_valid_record(&json!({
            "messages": [{"role": "user", "content": "only one"}]
        })));
    }

    #[test]
    fn test_message_missing_keys_rejected() {
        assert!(!is_valid_record(&json!({
            "messages": [
                {"role": "user", "content": "q"},
                {"role": "assistant"}
            ]
        })));
        assert!(!is_valid_record(&json!({
            "messages": [
                {"content": "no role"},
                {"role": "assistant", "content": "a"}
            ]
        })));
        assert!(!is_valid_record(&json!({
            "messages": [
                "not an object",
                {"role": "assistant", "content": "a"}
            ]
        })));
    }

    #[test]
    fn test_unknown_role_invalidates_whole_record() {
        assert!(!is_valid_record(&json!({
            "messages": [
                {"role": "user", "content": "q"},
                {"role": "tool", "content": "a"}
            ]
        })));
    }

    #[test]
    fn test_first_user_message() {
        let record = valid_record();
        assert_eq!(first_user_message(&record), Some("如何理财？"));

        let no_user = json!({
            "messages": [
                {"role": "system", "content": "s"},
                {"role": "assistant", "content": "a"}
            ]
        });
        assert_eq!(first_user_message(&no_user), None);
    }
}
