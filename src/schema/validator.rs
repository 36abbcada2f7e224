//! Activity validation step

use serde_json::Value;

use super::registry::{ACTIVITY_SCHEMA, SchemaValidator};
use super::sanitize::strip_nulls;
use crate::error::AppError;
use crate::metrics::VALIDATIONS_TOTAL;

/// Result of validating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Null-stripped candidate that matched the activity schema
    Valid(Value),
    /// Nothing left after stripping nulls
    Empty,
    /// No `type` field
    MissingType,
    /// Schema violations, one message each
    SchemaViolation(Vec<String>),
    /// The validator itself failed (unknown schema, ...)
    ValidatorFailed(String),
}

impl ValidationOutcome {
    fn label(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid(_) => "valid",
            ValidationOutcome::Empty => "empty",
            ValidationOutcome::MissingType => "missing_type",
            ValidationOutcome::SchemaViolation(_) => "schema_violation",
            ValidationOutcome::ValidatorFailed(_) => "validator_failed",
        }
    }

    pub fn into_valid(self) -> Option<Value> {
        match self {
            ValidationOutcome::Valid(value) => Some(value),
            _ => None,
        }
    }
}

/// Strip nulls from `candidate` and check it against the activity schema.
///
/// Never fails: every reason for rejection is reported through the outcome
/// and logged.
pub async fn validate_activity(
    validator: &dyn SchemaValidator,
    candidate: &Value,
) -> ValidationOutcome {
    tracing::debug!("Validation process");

    let parsed = strip_nulls(candidate);
    let outcome = check(validator, parsed).await;

    VALIDATIONS_TOTAL
        .with_label_values(&[outcome.label()])
        .inc();

    outcome
}

async fn check(validator: &dyn SchemaValidator, parsed: Value) -> ValidationOutcome {
    let is_empty = match &parsed {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return ValidationOutcome::Empty;
    }

    if parsed.get("type").is_none() {
        tracing::debug!(parsed = %parsed, "Type not found.");
        return ValidationOutcome::MissingType;
    }

    match validator.validate(&parsed, ACTIVITY_SCHEMA).await {
        Ok(()) => ValidationOutcome::Valid(parsed),
        Err(AppError::Schema(errors)) => {
            tracing::error!(?errors, "Activity does not match the activity schema");
            ValidationOutcome::SchemaViolation(errors)
        }
        Err(error) => {
            let error = error.record("validate");
            tracing::error!(%error, "Activity validation could not run");
            ValidationOutcome::ValidatorFailed(error.to_string())
        }
    }
}
