//! Inbound webhook event, extracted from the raw Intercom payload.

use serde_json::Value;

/// The fields the orchestrator needs from a webhook delivery.
///
/// Extraction is lenient: any missing or oddly-typed field becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEvent {
    pub topic: Option<String>,
    /// `data.item.id`, coerced to a string.
    pub conversation_id: Option<String>,
    /// Author of the last part in `data.item.conversation_parts.conversation_parts`.
    pub author_email: Option<String>,
}

impl WebhookEvent {
    pub fn from_payload(payload: &Value) -> Self {
        let topic = payload
            .get("topic")
            .and_then(Value::as_str)
            .map(str::to_string);
        let conversation_id = payload
            .pointer("/data/item/id")
            .and_then(id_to_string);
        let author_email = payload
            .pointer("/data/item/conversation_parts/conversation_parts")
            .and_then(Value::as_array)
            .and_then(|parts| parts.last())
            .and_then(|part| part.pointer("/author/email"))
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
            .map(str::to_string);

        Self {
            topic,
            conversation_id,
            author_email,
        }
    }
}

/// Identifiers arrive as strings, occasionally as numbers. Empty strings count as absent.
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
