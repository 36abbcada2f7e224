//! JSON schema registry

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::config::SchemaConfig;
use crate::error::AppError;

/// Name of the activity schema
pub const ACTIVITY_SCHEMA: &str = "activity";

const BUNDLED_ACTIVITY_SCHEMA: &str = include_str!("../../schemas/activity.json");

/// Checks candidates against named schemas
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// # Errors
    /// `AppError::Schema` with one message per violation, or
    /// `AppError::SchemaLoad` when `schema_name` is unknown.
    async fn validate(&self, candidate: &Value, schema_name: &str) -> Result<(), AppError>;
}

/// Compiled Draft 7 schemas keyed by name
pub struct JsonSchemaRegistry {
    schemas: HashMap<String, JSONSchema>,
}

impl JsonSchemaRegistry {
    /// Registry holding only the bundled schemas
    pub fn bundled() -> Result<Self, AppError> {
        let activity: Value = serde_json::from_str(BUNDLED_ACTIVITY_SCHEMA)?;

        let mut registry = Self {
            schemas: HashMap::new(),
        };
        registry.insert(ACTIVITY_SCHEMA, &activity)?;
        Ok(registry)
    }

    /// Bundled schemas, replaced by any `<name>.json` found in the
    /// configured directory
    pub fn from_config(config: &SchemaConfig) -> Result<Self, AppError> {
        let mut registry = Self::bundled()?;

        if let Some(directory) = config.directory.as_deref().filter(|dir| dir.is_dir()) {
            let loaded = registry.load_directory(directory)?;
            tracing::info!(
                directory = %directory.display(),
                loaded,
                "Schema overrides loaded"
            );
        }

        Ok(registry)
    }

    /// Load every `*.json` file of `directory`, named after its file stem.
    pub fn load_directory(&mut self, directory: &Path) -> Result<usize, AppError> {
        let mut loaded = 0;

        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path)?;
            let schema: Value = serde_json::from_str(&content).map_err(|e| {
                AppError::SchemaLoad(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            self.insert(name, &schema)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Compile and register `schema` under `name`, replacing any previous one.
    pub fn insert(&mut self, name: &str, schema: &Value) -> Result<(), AppError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| AppError::SchemaLoad(format!("Failed to compile schema {}: {}", name, e)))?;

        self.schemas.insert(name.to_string(), compiled);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }
}

#[async_trait]
impl SchemaValidator for JsonSchemaRegistry {
    async fn validate(&self, candidate: &Value, schema_name: &str) -> Result<(), AppError> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| AppError::SchemaLoad(format!("Unknown schema: {}", schema_name)))?;

        schema.validate(candidate).map_err(|errors| {
            AppError::Schema(
                errors
                    .map(|e| format!("{} at {}", e, e.instance_path))
                    .collect(),
            )
        })
    }
}
