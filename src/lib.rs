//! causelist - court cause list retrieval.
//!
//! Drives the eCourts cause list form in a headless browser, harvests the
//! resulting document links and downloads them to a local directory.
//!
//! The pipeline runs strictly in sequence: the form navigator fills the
//! cascading state → district → court complex → court selection, the
//! harvester collects document links and releases the browser, and the
//! downloader streams each document to disk while reporting progress.

pub mod config;
pub mod models;
pub mod scrapers;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use models::{CriteriaError, SelectionCriteria};
pub use services::{CauseListFetcher, DownloadError, Downloader, ProgressSink};
