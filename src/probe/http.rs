//! HTTP-backed media probe

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{FileInfo, MediaProbe, OCTET_STREAM, guess_from_extension, sniff_mimetype};
use crate::config::ProbeConfig;
use crate::error::AppError;
use crate::metrics::PROBE_DURATION_SECONDS;

/// Content types that say nothing about the payload
const GENERIC_TYPES: &[&str] = &[OCTET_STREAM, "binary/octet-stream"];

/// Probe that fetches the URL and inspects the response
///
/// Resolution order:
/// 1. `Content-Type` header, unless it is missing or generic
/// 2. Signature of the first `sniff_bytes` bytes of the body
/// 3. Extension of the URL path
/// 4. `application/octet-stream`
pub struct HttpMediaProbe {
    client: reqwest::Client,
    sniff_bytes: usize,
}

impl HttpMediaProbe {
    /// Create a probe with its own HTTP client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &ProbeConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_client(client, config.sniff_bytes))
    }

    /// Create a probe around an existing client
    pub fn with_client(client: reqwest::Client, sniff_bytes: usize) -> Self {
        Self {
            client,
            sniff_bytes: sniff_bytes.max(1),
        }
    }

    async fn fetch(&self, url: &str) -> Result<FileInfo, AppError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Probe(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Probe(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(';')
                    .next()
                    .unwrap_or(value)
                    .trim()
                    .to_ascii_lowercase()
            })
            .filter(|value| !value.is_empty());
        let size = response.content_length();

        if let Some(mimetype) = declared
            .as_deref()
            .filter(|value| !GENERIC_TYPES.contains(value))
        {
            return Ok(FileInfo {
                url: url.to_string(),
                mimetype: mimetype.to_string(),
                size,
            });
        }

        let mut head = Vec::with_capacity(self.sniff_bytes);
        while head.len() < self.sniff_bytes {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| AppError::Probe(format!("Failed to read {}: {}", url, e)))?;
            match chunk {
                Some(chunk) => head.extend_from_slice(&chunk),
                None => break,
            }
        }

        let mimetype = sniff_mimetype(&head)
            .or_else(|| guess_from_extension(url))
            .unwrap_or(OCTET_STREAM)
            .to_string();

        tracing::debug!(url, %mimetype, sniffed = head.len(), "Media type resolved from content");

        Ok(FileInfo {
            url: url.to_string(),
            mimetype,
            size,
        })
    }
}

#[async_trait]
impl MediaProbe for HttpMediaProbe {
    async fn probe(&self, url: &str) -> Result<FileInfo, AppError> {
        let started = Instant::now();
        let result = self.fetch(url).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        PROBE_DURATION_SECONDS
            .with_label_values(&[status])
            .observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(info) => tracing::debug!(url, mimetype = %info.mimetype, "Media probe finished"),
            Err(error) => tracing::warn!(url, %error, "Media probe failed"),
        }

        result
    }
}
