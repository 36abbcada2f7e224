//! Media metadata probing
//!
//! The mapper only needs one answer from a URL: its MIME type. The
//! [`MediaProbe`] trait keeps that lookup injectable; [`HttpMediaProbe`] is
//! the network-backed implementation.

mod http;
mod sniff;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use http::HttpMediaProbe;
pub use sniff::{guess_from_extension, sniff_mimetype};

/// Fallback MIME type when nothing better is known
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Metadata about a remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub url: String,
    pub mimetype: String,
    /// Content length, when the server reported one
    pub size: Option<u64>,
}

impl FileInfo {
    pub fn is_image(&self) -> bool {
        self.mimetype.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mimetype.starts_with("video/")
    }
}

/// Resolves a URL into file metadata
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Fetch metadata for `url`.
    ///
    /// # Errors
    /// Network, I/O and HTTP status failures are returned as errors.
    async fn probe(&self, url: &str) -> Result<FileInfo, AppError>;
}

/// True when `text` is an absolute http(s) URL with a host.
pub fn is_web_url(text: &str) -> bool {
    if text.trim() != text || text.is_empty() {
        return false;
    }

    match url::Url::parse(text) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
