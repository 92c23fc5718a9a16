//! Document download service.
//!
//! Streams harvested documents to disk one at a time, in harvest order.
//! Separated from UI concerns - reports progress through a [`ProgressSink`].

mod types;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use crate::models::SelectionCriteria;
use crate::scrapers::HttpClient;
use crate::utils::output_filename;

pub use types::{DownloadConfig, DownloadError, ProgressSink};

/// Suffix for documents still being written.
const PARTIAL_SUFFIX: &str = ".part";

/// Service for downloading harvested documents.
pub struct Downloader {
    client: HttpClient,
    config: DownloadConfig,
}

impl Downloader {
    /// Create a new download service.
    pub fn new(config: DownloadConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(
            Duration::from_secs(config.timeout),
            config.user_agent.as_deref(),
            config.proxy.as_deref(),
        )
        .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Download every URL into `dest`, in order, one attempt each.
    ///
    /// A failed document is reported to the sink and skipped. Only an
    /// unusable destination directory fails the whole batch. Returns the
    /// paths written, in harvest order.
    pub async fn download<S>(
        &self,
        criteria: &SelectionCriteria,
        urls: &[String],
        dest: &Path,
        sink: &mut S,
    ) -> anyhow::Result<Vec<PathBuf>>
    where
        S: ProgressSink + ?Sized,
    {
        fs::create_dir_all(dest)
            .await
            .with_context(|| format!("Failed to create output directory {}", dest.display()))?;

        let total = urls.len();
        let mut saved = Vec::with_capacity(total);

        for (idx, url) in urls.iter().enumerate() {
            let index = idx + 1;
            let path = dest.join(output_filename(criteria, url));

            match self.transfer(url, &path).await {
                Ok(bytes) => {
                    info!("Saved {} ({} bytes) to {}", url, bytes, path.display());
                    saved.push(path);
                    sink.on_progress(index, total);
                }
                Err(e) => {
                    warn!("Failed to download {}: {}", url, e);
                    sink.on_failure(url, &e);
                }
            }
        }

        info!("Downloaded {}/{} document(s)", saved.len(), total);
        Ok(saved)
    }

    /// Stream one document to `path`.
    ///
    /// The body goes to a `.part` sibling first and is renamed on success, so
    /// a failure never leaves a truncated file under the final name and never
    /// clobbers a copy from an earlier run.
    async fn transfer(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let mut response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(DownloadError::Status(response.status));
        }

        let partial = partial_path(path);
        let result = async {
            let file = fs::File::create(&partial).await?;
            let mut writer = BufWriter::with_capacity(self.config.chunk_size, file);
            let mut written = 0u64;

            while let Some(chunk) = response.chunk().await? {
                writer.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }

            writer.flush().await?;
            fs::rename(&partial, path).await?;
            Ok::<u64, DownloadError>(written)
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&partial).await;
        }
        result
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/tmp/out/a_b_list1.pdf")),
            PathBuf::from("/tmp/out/a_b_list1.pdf.part")
        );
    }

    #[test]
    fn closures_are_progress_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |i: usize, t: usize| seen.push((i, t));
            sink.on_progress(1, 3);
            sink.on_failure("http://x/y.pdf", &DownloadError::Status(reqwest::StatusCode::NOT_FOUND));
            sink.on_progress(3, 3);
        }
        assert_eq!(seen, vec![(1, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn empty_batch_creates_directory_only() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("out");
        let downloader = Downloader::new(DownloadConfig::default()).unwrap();
        let criteria = SelectionCriteria::new("S", "D", "C", "", "2024-05-01");
        let mut calls = 0;

        let saved = downloader
            .download(&criteria, &[], &dest, &mut |_: usize, _: usize| calls += 1)
            .await
            .unwrap();

        assert!(saved.is_empty());
        assert_eq!(calls, 0);
        assert!(dest.is_dir());
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unreachable_url_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(DownloadConfig {
            timeout: 2,
            ..Default::default()
        })
        .unwrap();
        let criteria = SelectionCriteria::new("S", "D", "C", "", "2024-05-01");
        let urls = vec!["http://127.0.0.1:1/list.pdf".to_string()];
        let mut calls = Vec::new();

        let saved = downloader
            .download(&criteria, &urls, dir.path(), &mut |i: usize, t: usize| {
                calls.push((i, t))
            })
            .await
            .unwrap();

        assert!(saved.is_empty());
        assert!(calls.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unwritable_destination_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let downloader = Downloader::new(DownloadConfig::default()).unwrap();
        let criteria = SelectionCriteria::new("S", "D", "C", "", "2024-05-01");

        let result = downloader
            .download(&criteria, &[], &blocker.join("out"), &mut |_: usize, _: usize| {})
            .await;
        assert!(result.is_err());
    }
}
