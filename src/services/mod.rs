//! Service layer for cause list retrieval.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI or embedded in another front end.

pub mod download;
pub mod pipeline;

pub use download::{DownloadConfig, DownloadError, Downloader, ProgressSink};
pub use pipeline::CauseListFetcher;
