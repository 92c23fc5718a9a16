//! Download service types.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the download service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Per-document timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Write buffer size in bytes; bounds memory held per document.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// User agent: unset for the default, "impersonate", or a literal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Proxy URL for document requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_chunk_size() -> usize {
    32 * 1024
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            chunk_size: default_chunk_size(),
            user_agent: None,
            proxy: None,
        }
    }
}

/// Why a single document could not be saved.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives progress from a batch download.
///
/// `on_progress(index, total)` fires once per saved document, where `index`
/// is the document's 1-based position in the harvested list and `total` is
/// the harvested count. Failed documents never advance progress, so the last
/// reported index can be below `total`; the returned path list is the
/// authoritative result.
pub trait ProgressSink {
    fn on_progress(&mut self, index: usize, total: usize);

    /// Called when a document fails; the batch continues.
    fn on_failure(&mut self, _url: &str, _error: &DownloadError) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, index: usize, total: usize) {
        self(index, total)
    }
}
