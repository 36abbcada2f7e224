//! Activity validation
//!
//! Handles:
//! - Null stripping of candidate documents
//! - JSON schema registry (bundled schemas plus directory overrides)
//! - The guard-and-validate step of the pipeline

mod registry;
mod sanitize;
mod validator;

pub use registry::{ACTIVITY_SCHEMA, JsonSchemaRegistry, SchemaValidator};
pub use sanitize::strip_nulls;
pub use validator::{ValidationOutcome, validate_activity};
