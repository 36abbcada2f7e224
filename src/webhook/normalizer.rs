//! Webhook normalization
//!
//! Turns a delivery wrapper into a [`NormalizedEvent`]. Anything that is not
//! an `sms.mo` body yields no event; the reason is kept in
//! [`NormalizeOutcome`] for logging and metrics.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::models::{EventAt, NormalizedEvent, RawWebhookBody, WebhookEvent};
use crate::metrics::WEBHOOKS_RECEIVED;

/// Body type of a mobile-originated SMS
pub const SMS_MO: &str = "sms.mo";

/// Result of normalizing one webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// An `sms.mo` body was found
    Normalized(NormalizedEvent),
    /// No body, a null body or an empty body
    MissingBody,
    /// A body of another type (delivery receipts, calls, ...)
    UnsupportedType(Option<String>),
    /// The body does not have the webhook shape
    Malformed(String),
}

impl NormalizeOutcome {
    fn label(&self) -> &'static str {
        match self {
            NormalizeOutcome::Normalized(_) => "normalized",
            NormalizeOutcome::MissingBody => "missing_body",
            NormalizeOutcome::UnsupportedType(_) => "unsupported_type",
            NormalizeOutcome::Malformed(_) => "malformed",
        }
    }

    pub fn into_event(self) -> Option<NormalizedEvent> {
        match self {
            NormalizeOutcome::Normalized(event) => Some(event),
            _ => None,
        }
    }
}

/// Normalize a webhook delivery wrapper (`{ request: { body } }`).
pub fn normalize(event: &serde_json::Value) -> NormalizeOutcome {
    tracing::debug!("Event received to normalize");

    let body = match serde_json::from_value::<WebhookEvent>(event.clone()) {
        Ok(wrapper) => wrapper.request.and_then(|request| request.body),
        Err(error) => {
            return record(NormalizeOutcome::Malformed(format!(
                "invalid delivery wrapper: {error}"
            )));
        }
    };

    match body {
        Some(body) => normalize_body(&body),
        None => record(NormalizeOutcome::MissingBody),
    }
}

/// Normalize a bare webhook body.
pub fn normalize_body(body: &serde_json::Value) -> NormalizeOutcome {
    let is_empty = match body {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return record(NormalizeOutcome::MissingBody);
    }

    let raw: RawWebhookBody = match serde_json::from_value(body.clone()) {
        Ok(raw) => raw,
        Err(error) => {
            return record(NormalizeOutcome::Malformed(error.to_string()));
        }
    };

    if raw.kind.as_deref() != Some(SMS_MO) {
        return record(NormalizeOutcome::UnsupportedType(raw.kind));
    }

    let timestamp = match raw.event_at {
        Some(EventAt::Text(event_at)) => {
            let parsed = parse_event_at(&event_at);
            if parsed.is_none() {
                tracing::warn!(%event_at, "Unparseable event_at; timestamp left empty");
            }
            parsed
        }
        Some(EventAt::EpochMillis(millis)) => {
            let in_range = DateTime::from_timestamp_millis(millis).is_some();
            if !in_range {
                tracing::warn!(millis, "event_at out of range; timestamp left empty");
            }
            in_range.then_some(millis)
        }
        None => None,
    };

    let data = raw.data.unwrap_or_default();
    let event = NormalizedEvent {
        event_id: raw.event_id,
        sender_phone_number: data.from,
        to_phone_number: data.to,
        text: data.text,
        timestamp,
        kind: SMS_MO.to_string(),
    };

    let missing = event.missing_fields();
    if !missing.is_empty() {
        tracing::debug!(?missing, "Normalized event has absent fields");
    }

    record(NormalizeOutcome::Normalized(event))
}

/// Parse a webhook `event_at` into epoch milliseconds.
///
/// Accepts RFC 3339 and the space-separated form Callr sends
/// (`2016-10-27 10:44:24`); offset-less values are read as UTC.
pub fn parse_event_at(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f %z"] {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}

fn record(outcome: NormalizeOutcome) -> NormalizeOutcome {
    WEBHOOKS_RECEIVED
        .with_label_values(&[outcome.label()])
        .inc();

    match &outcome {
        NormalizeOutcome::Normalized(_) => {}
        NormalizeOutcome::MissingBody => tracing::debug!("Webhook has no body; ignoring"),
        NormalizeOutcome::UnsupportedType(kind) => {
            tracing::debug!(kind = ?kind, "Webhook body is not an sms.mo; ignoring")
        }
        NormalizeOutcome::Malformed(reason) => {
            tracing::debug!(%reason, "Webhook body could not be decoded; ignoring")
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delivery(body: serde_json::Value) -> serde_json::Value {
        json!({ "request": { "body": body } })
    }

    #[test]
    fn normalizes_sms_mo_body() {
        let outcome = normalize(&delivery(json!({
            "type": "sms.mo",
            "data": { "from": "+33600000001", "to": "+33600000002", "text": "hello" },
            "event_id": "evt-1",
            "event_at": "2016-10-27T10:44:24Z",
        })));

        let event = outcome.into_event().expect("sms.mo must normalize");
        assert_eq!(event.event_id.as_deref(), Some("evt-1"));
        assert_eq!(event.sender_phone_number.as_deref(), Some("+33600000001"));
        assert_eq!(event.to_phone_number.as_deref(), Some("+33600000002"));
        assert_eq!(event.text.as_deref(), Some("hello"));
        assert_eq!(event.timestamp, Some(1_477_565_064_000));
        assert_eq!(event.kind, SMS_MO);
    }

    #[test]
    fn other_body_types_are_ignored() {
        for kind in [json!("sms.mt"), json!("call.inbound"), json!(null), json!("SMS.MO")] {
            let outcome = normalize(&delivery(json!({
                "type": kind,
                "data": { "from": "+1", "to": "+2", "text": "x" },
            })));
            assert!(
                matches!(outcome, NormalizeOutcome::UnsupportedType(_)),
                "type {kind} must be ignored"
            );
        }
    }

    #[test]
    fn missing_or_empty_body_is_ignored() {
        assert_eq!(normalize(&json!({})), NormalizeOutcome::MissingBody);
        assert_eq!(normalize(&json!({ "request": {} })), NormalizeOutcome::MissingBody);
        assert_eq!(normalize(&delivery(json!(null))), NormalizeOutcome::MissingBody);
        assert_eq!(normalize(&delivery(json!({}))), NormalizeOutcome::MissingBody);
    }

    #[test]
    fn malformed_body_is_ignored() {
        let outcome = normalize(&delivery(json!({ "type": "sms.mo", "data": 12 })));
        assert!(matches!(outcome, NormalizeOutcome::Malformed(_)));
        assert!(outcome.into_event().is_none());

        assert!(matches!(normalize(&json!("text")), NormalizeOutcome::Malformed(_)));
    }

    #[test]
    fn numeric_fields_are_kept() {
        let event = normalize_body(&json!({
            "type": "sms.mo",
            "data": { "from": 33639980042_u64, "to": "+33678912345", "text": "hi" },
            "event_id": "evt-2",
            "event_at": 1_477_565_064_000_i64,
        }))
        .into_event()
        .expect("numeric fields must not reject the body");

        assert_eq!(event.sender_phone_number.as_deref(), Some("33639980042"));
        assert_eq!(event.to_phone_number.as_deref(), Some("+33678912345"));
        assert_eq!(event.timestamp, Some(1_477_565_064_000));
    }

    #[test]
    fn unusable_fields_become_absent() {
        let event = normalize_body(&json!({
            "type": "sms.mo",
            "data": { "from": { "number": "+1" }, "to": "+33678912345", "text": "hi" },
            "event_at": [2016, 10, 27],
        }))
        .into_event()
        .expect("an odd field must not reject the body");

        assert!(event.sender_phone_number.is_none());
        assert_eq!(event.text.as_deref(), Some("hi"));
        assert_eq!(event.timestamp, None);
        assert_eq!(event.missing_fields(), vec!["event_id", "data.from", "event_at"]);

        let out_of_range = normalize_body(&json!({ "type": "sms.mo", "event_at": i64::MAX }))
            .into_event()
            .unwrap();
        assert_eq!(out_of_range.timestamp, None);
    }

    #[test]
    fn absent_fields_stay_absent() {
        let event = normalize_body(&json!({ "type": "sms.mo" }))
            .into_event()
            .unwrap();

        assert!(event.sender_phone_number.is_none());
        assert!(event.text.is_none());
        assert!(event.timestamp.is_none());
        assert_eq!(event.missing_fields().len(), 5);
    }

    #[test]
    fn invalid_event_at_leaves_timestamp_empty() {
        let event = normalize_body(&json!({
            "type": "sms.mo",
            "data": { "text": "hi" },
            "event_at": "yesterday-ish",
        }))
        .into_event()
        .unwrap();

        assert_eq!(event.timestamp, None);
        assert_eq!(event.text.as_deref(), Some("hi"));
    }

    #[test]
    fn parse_event_at_accepts_callr_formats() {
        assert_eq!(parse_event_at("2016-10-27 10:44:24"), Some(1_477_565_064_000));
        assert_eq!(parse_event_at("2016-10-27T10:44:24.500"), Some(1_477_565_064_500));
        assert_eq!(
            parse_event_at("2016-10-27T12:44:24+02:00"),
            Some(1_477_565_064_000)
        );
        assert_eq!(parse_event_at("2016-10-27"), Some(1_477_526_400_000));
        assert_eq!(parse_event_at(""), None);
        assert_eq!(parse_event_at("not a date"), None);
    }
}
