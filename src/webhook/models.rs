//! Webhook payload models
//!
//! `WebhookEvent` mirrors the delivery wrapper handed over by the transport
//! (`{ request: { body: ... } }`). Every field is optional: absence is a
//! normal condition and is reported, not rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Delivery wrapper around a webhook request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub request: Option<WebhookRequest>,
}

/// The HTTP request as seen by the transport
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookRequest {
    /// Kept untyped until the body type has been checked
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

/// Callr webhook body
///
/// Example:
/// ```json
/// {
///   "type": "sms.mo",
///   "data": { "from": "+33639980042", "to": "+33678912345", "text": "hello" },
///   "event_id": "7cd4d2ec",
///   "event_at": "2016-10-27 10:44:24"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWebhookBody {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<SmsData>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_event_at")]
    pub event_at: Option<EventAt>,
}

/// SMS payload of an `sms.mo` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

/// `event_at` as sent: a date string, or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAt {
    Text(String),
    EpochMillis(i64),
}

/// Strings are taken as is and numbers are rendered as text (older payloads
/// sent numeric ids and phone numbers). Any other JSON type is dropped with a
/// warning so one odd field does not discard the whole body.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(other) => {
            tracing::warn!(value = %other, "Unusable webhook field; treated as absent");
            None
        }
    })
}

fn lenient_event_at<'de, D>(deserializer: D) -> Result<Option<EventAt>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(EventAt::Text(text)),
        Some(Value::Number(number)) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
            if millis.is_none() {
                tracing::warn!(event_at = %number, "Unusable numeric event_at; treated as absent");
            }
            millis.map(EventAt::EpochMillis)
        }
        Some(other) => {
            tracing::warn!(event_at = %other, "Unusable event_at; treated as absent");
            None
        }
    })
}

/// Flat view of an `sms.mo` webhook
///
/// Serialized with the field names downstream consumers expect
/// (`eventID`, `senderPhoneNumber`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEvent {
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
    #[serde(rename = "senderPhoneNumber")]
    pub sender_phone_number: Option<String>,
    #[serde(rename = "toPhoneNumber")]
    pub to_phone_number: Option<String>,
    pub text: Option<String>,
    /// Epoch milliseconds of `event_at`; `None` when absent or unparseable
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NormalizedEvent {
    /// Names of the expected fields that were absent from the body.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.event_id.is_none() {
            missing.push("event_id");
        }
        if self.sender_phone_number.is_none() {
            missing.push("data.from");
        }
        if self.to_phone_number.is_none() {
            missing.push("data.to");
        }
        if self.text.is_none() {
            missing.push("data.text");
        }
        if self.timestamp.is_none() {
            missing.push("event_at");
        }
        missing
    }

    /// Event id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.event_id.as_deref().filter(|id| !id.is_empty())
    }
}
