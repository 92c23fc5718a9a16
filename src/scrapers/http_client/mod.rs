//! HTTP client for document downloads.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{random_user_agent, resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// HTTP client with a per-request timeout and configurable identity.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// `user_agent_config` follows [`resolve_user_agent`]; `proxy` is any URL
    /// reqwest accepts (`http://`, `socks5://`).
    pub fn new(
        timeout: Duration,
        user_agent_config: Option<&str>,
        proxy: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(user_agent_config);
        let mut builder = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Make a GET request. Non-2xx statuses are returned, not raised.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        Ok(HttpResponse { status, response })
    }
}
