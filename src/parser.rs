//! Webhook to activity pipeline
//!
//! `Parser` wires the three stages together:
//!
//! ```text
//! webhook JSON ──normalize──▶ NormalizedEvent ──parse──▶ Activity ──validate──▶ JSON
//!                  │                               │                 │
//!             None if not sms.mo          Err on probe failure   None if invalid
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::activity::{Activity, ActivityMapper, Generator, IdGenerator, UuidGenerator};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::probe::{HttpMediaProbe, MediaProbe};
use crate::schema::{JsonSchemaRegistry, SchemaValidator, validate_activity};
use crate::webhook::{self, NormalizedEvent};

/// SMS webhook parser
///
/// Holds no per-event state; one instance can be shared across tasks.
pub struct Parser {
    mapper: ActivityMapper,
    validator: Arc<dyn SchemaValidator>,
}

impl Parser {
    /// Create a parser from explicit collaborators
    pub fn new(
        generator: Generator,
        probe: Arc<dyn MediaProbe>,
        validator: Arc<dyn SchemaValidator>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            mapper: ActivityMapper::new(generator, probe, ids),
            validator,
        }
    }

    /// Create a parser with the HTTP probe, the schema registry and UUID ids
    ///
    /// # Errors
    /// Returns error if the HTTP client or the schemas cannot be set up
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let probe = HttpMediaProbe::new(&config.probe)?;
        let registry = JsonSchemaRegistry::from_config(&config.schema)?;

        tracing::info!(
            service_id = %config.service.id,
            service_name = %config.service.name,
            "Parser initialized"
        );

        Ok(Self::new(
            Generator::service(config.service.id.clone(), config.service.name.clone()),
            Arc::new(probe),
            Arc::new(registry),
            Arc::new(UuidGenerator),
        ))
    }

    /// Extract the SMS fields of a webhook delivery; `None` unless it is an
    /// `sms.mo` body.
    pub fn normalize(&self, event: &Value) -> Option<NormalizedEvent> {
        webhook::normalize(event).into_event()
    }

    /// Build the activity for a normalized event
    ///
    /// # Errors
    /// Returns the media probe error when the text is a URL that cannot be
    /// probed.
    pub async fn parse(&self, event: &NormalizedEvent) -> Result<Activity, AppError> {
        self.mapper.map(event).await
    }

    /// Strip nulls and check against the activity schema; `None` when the
    /// candidate is empty, untyped or invalid.
    pub async fn validate(&self, candidate: &Value) -> Option<Value> {
        validate_activity(self.validator.as_ref(), candidate)
            .await
            .into_valid()
    }

    /// Run normalize, parse and validate in sequence.
    ///
    /// # Errors
    /// Only media probe failures are errors.
    pub async fn process(&self, event: &Value) -> Result<Option<Value>, AppError> {
        let Some(normalized) = self.normalize(event) else {
            return Ok(None);
        };

        let activity = self.parse(&normalized).await?;
        let candidate = activity.to_value()?;

        Ok(self.validate(&candidate).await)
    }
}
