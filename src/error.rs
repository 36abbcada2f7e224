//! Error types for callr-bridge
//!
//! Only hard failures travel through `AppError`. Inputs that are simply not
//! applicable (wrong webhook type, missing `type`, schema mismatch) are not
//! errors and surface as `None` from the pipeline instead.

use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Media probe failed (unreachable host, bad status, unreadable body)
    #[error("Media probe failed: {0}")]
    Probe(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Candidate does not match a JSON schema
    #[error("Schema validation failed: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Schema could not be loaded or compiled, or is unknown
    #[error("Schema error: {0}")]
    SchemaLoad(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (reading input or schema files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short label used for the error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Probe(_) => "probe",
            AppError::HttpClient(_) => "http_client",
            AppError::Schema(_) => "schema",
            AppError::SchemaLoad(_) => "schema_load",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Internal(_) => "internal",
        }
    }

    /// Record this error in the error counter and hand it back.
    pub fn record(self, stage: &str) -> Self {
        crate::metrics::ERRORS_TOTAL
            .with_label_values(&[self.kind(), stage])
            .inc();
        self
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_violation() {
        let error = AppError::Schema(vec![
            "\"id\" is a required property at /actor".to_string(),
            "\"Create\" is not one of [\"Note\"] at /type".to_string(),
        ]);

        let message = error.to_string();
        assert!(message.starts_with("Schema validation failed: "));
        assert!(message.contains("/actor"));
        assert!(message.contains("; "));
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(AppError::Probe("timeout".to_string()).kind(), "probe");
        assert_eq!(AppError::Config("bad".to_string()).kind(), "config");
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).kind(),
            "internal"
        );
    }

    #[tokio::test]
    async fn reqwest_errors_convert_to_http_client() {
        let error: AppError = reqwest::get("not a url").await.unwrap_err().into();

        assert_eq!(error.kind(), "http_client");
        assert!(error.to_string().starts_with("HTTP client error: "));
    }
}
