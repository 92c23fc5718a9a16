//! End-to-end cause list retrieval.
//!
//! validate → open portal → fill form → harvest links and close the browser
//! → download. Each stage finishes before the next starts, and the browser
//! is released before the first download begins.

use std::path::{Path, PathBuf};

use tracing::info;

use super::download::{Downloader, ProgressSink};
use crate::config::Settings;
use crate::models::SelectionCriteria;
use crate::scrapers::portal::{harvest, navigate, FormPage};

/// Runs the cause list pipeline with one set of settings.
///
/// Callers must not start a second run while one is in flight; each run
/// owns its browser session.
pub struct CauseListFetcher {
    settings: Settings,
}

impl CauseListFetcher {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Fill the portal form in a fresh browser and return the document links.
    pub async fn collect_links(&self, criteria: &SelectionCriteria) -> anyhow::Result<Vec<String>> {
        criteria.validate()?;
        let page = self.open_portal().await?;
        Ok(self.harvest_from(page, criteria).await)
    }

    /// Navigate `page` and harvest its document links. The page is closed on return.
    pub async fn harvest_from<P: FormPage>(&self, page: P, criteria: &SelectionCriteria) -> Vec<String> {
        navigate(&page, criteria, &self.settings.form).await;
        harvest(page, &self.settings.harvest).await
    }

    /// Full run against the live portal: returns the paths of the saved documents.
    pub async fn fetch<S>(
        &self,
        criteria: &SelectionCriteria,
        dest: &Path,
        sink: &mut S,
    ) -> anyhow::Result<Vec<PathBuf>>
    where
        S: ProgressSink + ?Sized,
    {
        criteria.validate()?;
        let downloader = Downloader::new(self.settings.download.clone())?;
        let links = self.collect_links(criteria).await?;
        self.download_links(&downloader, criteria, &links, dest, sink).await
    }

    /// Full run against an already opened page. The page is closed on every path.
    pub async fn fetch_from<P, S>(
        &self,
        mut page: P,
        criteria: &SelectionCriteria,
        dest: &Path,
        sink: &mut S,
    ) -> anyhow::Result<Vec<PathBuf>>
    where
        P: FormPage,
        S: ProgressSink + ?Sized,
    {
        let downloader = match criteria
            .validate()
            .map_err(anyhow::Error::from)
            .and_then(|_| Downloader::new(self.settings.download.clone()))
        {
            Ok(downloader) => downloader,
            Err(e) => {
                page.close().await;
                return Err(e);
            }
        };
        let links = self.harvest_from(page, criteria).await;
        self.download_links(&downloader, criteria, &links, dest, sink).await
    }

    async fn download_links<S>(
        &self,
        downloader: &Downloader,
        criteria: &SelectionCriteria,
        links: &[String],
        dest: &Path,
        sink: &mut S,
    ) -> anyhow::Result<Vec<PathBuf>>
    where
        S: ProgressSink + ?Sized,
    {
        info!("Downloading {} document(s) to {}", links.len(), dest.display());
        downloader.download(criteria, links, dest, sink).await
    }

    #[cfg(feature = "browser")]
    async fn open_portal(&self) -> anyhow::Result<crate::scrapers::ChromePage> {
        crate::scrapers::ChromePage::open(&self.settings.browser, &self.settings.portal_url).await
    }

    #[cfg(not(feature = "browser"))]
    async fn open_portal(&self) -> anyhow::Result<crate::scrapers::HtmlSnapshotPage> {
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CriteriaError;
    use crate::scrapers::HtmlSnapshotPage;

    #[tokio::test]
    async fn invalid_criteria_never_opens_a_browser() {
        let fetcher = CauseListFetcher::new(Settings::default());
        let criteria = SelectionCriteria::new("Karnataka", "", "City Civil Court", "", "2024-05-01");

        let err = fetcher.collect_links(&criteria).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<CriteriaError>(),
            Some(&CriteriaError::MissingField("district"))
        );
    }

    #[tokio::test]
    async fn invalid_criteria_closes_page_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let fetcher = CauseListFetcher::new(Settings::default());
        let page = HtmlSnapshotPage::parse(r#"<a href="http://127.0.0.1:1/x.pdf">x</a>"#, None);
        let closed = page.closed_flag();
        let criteria = SelectionCriteria::new("Karnataka", "Bengaluru Urban", "City", "", "");

        let result = fetcher
            .fetch_from(page, &criteria, &dest, &mut |_: usize, _: usize| {})
            .await;

        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}
