//! Inbound Callr webhook handling
//!
//! Handles:
//! - Typed decoding of the webhook wrapper and body
//! - Normalization of `sms.mo` bodies into a flat event

mod models;
mod normalizer;

pub use models::{EventAt, NormalizedEvent, RawWebhookBody, SmsData, WebhookEvent, WebhookRequest};
pub use normalizer::{NormalizeOutcome, SMS_MO, normalize, normalize_body, parse_event_at};
