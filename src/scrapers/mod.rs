//! Portal scraping: browser sessions, form automation and HTTP transport.

pub mod browser;
pub mod http_client;
pub mod portal;

#[cfg(feature = "browser")]
pub use browser::{BrowserSession, ChromePage};
pub use browser::BrowserEngineConfig;
pub use http_client::HttpClient;
pub use portal::{FormPage, HtmlSnapshotPage};
