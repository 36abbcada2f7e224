use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fs;

/// Load a JSON schema from a file
pub fn load_schema(schema_path: &str) -> JSONSchema {
    let schema_content = fs::read_to_string(schema_path)
        .unwrap_or_else(|_| panic!("Failed to read schema file: {}", schema_path));

    let schema_json: Value = serde_json::from_str(&schema_content)
        .unwrap_or_else(|_| panic!("Failed to parse schema JSON: {}", schema_path));

    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_json)
        .expect("Failed to compile schema")
}

/// Validate a JSON value against a schema
pub fn validate_against_schema(data: &Value, schema: &JSONSchema) -> Result<(), Vec<String>> {
    match schema.validate(data) {
        Ok(_) => Ok(()),
        Err(errors) => {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{} at {}", e, e.instance_path))
                .collect();
            Err(error_messages)
        }
    }
}

/// Load a schema shipped in the crate's schemas directory
pub fn load_bundled_schema(schema_name: &str) -> JSONSchema {
    let schema_path = format!("{}/schemas/{}.json", env!("CARGO_MANIFEST_DIR"), schema_name);
    load_schema(&schema_path)
}

/// Panic with the offending document when `data` does not match `schema`
pub fn assert_matches_schema(data: &Value, schema: &JSONSchema) {
    if let Err(errors) = validate_against_schema(data, schema) {
        eprintln!("✗ Schema validation failed:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        eprintln!(
            "\nActual document:\n{}",
            serde_json::to_string_pretty(data).unwrap()
        );
        panic!("Schema validation failed with {} errors", errors.len());
    }
}
