//! HTTP response wrapper.

use bytes::Bytes;
use reqwest::{Response, StatusCode};

/// Response to a document request, body not yet read.
pub struct HttpResponse {
    pub status: StatusCode,
    pub(crate) response: Response,
}

impl HttpResponse {
    /// Check if the response is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Next chunk of the body, `None` at the end.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, reqwest::Error> {
        self.response.chunk().await
    }
}
