//! Document link harvesting.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::FormPage;

/// What counts as a cause list document link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// A link ending in one of these (any case) is a document.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// A link containing one of these (any case) is a document.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec![".pdf".to_string()]
}

fn default_keywords() -> Vec<String> {
    vec!["cause-list".to_string(), "causelist".to_string()]
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            keywords: default_keywords(),
        }
    }
}

/// Whether `url` looks like a cause list document.
pub fn is_document_link(url: &str, config: &HarvestConfig) -> bool {
    let lower = url.to_lowercase();
    config
        .extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
        || config
            .keywords
            .iter()
            .any(|kw| lower.contains(&kw.to_lowercase()))
}

/// Collect document links from the page, then close it.
///
/// Links are returned in page order with duplicates kept. Unreadable anchors
/// are skipped. The page is closed on every path before returning.
pub async fn harvest<P: FormPage>(mut page: P, config: &HarvestConfig) -> Vec<String> {
    let hrefs = page.anchor_hrefs().await;
    page.close().await;

    let total = hrefs.len();
    let links: Vec<String> = hrefs
        .into_iter()
        .flatten()
        .filter(|href| !href.is_empty())
        .filter(|href| {
            let keep = is_document_link(href, config);
            if !keep {
                debug!("Ignoring non-document link {}", href);
            }
            keep
        })
        .collect();

    info!("Harvested {} document link(s) from {} anchor(s)", links.len(), total);
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::portal::HtmlSnapshotPage;

    #[test]
    fn test_pdf_extension_any_case() {
        let config = HarvestConfig::default();
        assert!(is_document_link("https://example.com/a/list1.pdf", &config));
        assert!(is_document_link("https://example.com/a/LIST1.PDF", &config));
    }

    #[test]
    fn test_keywords_any_case() {
        let config = HarvestConfig::default();
        assert!(is_document_link("https://example.com/Cause-List/view?id=3", &config));
        assert!(is_document_link("https://example.com/dl.php?type=CAUSELIST", &config));
    }

    #[test]
    fn test_other_links_excluded() {
        let config = HarvestConfig::default();
        assert!(!is_document_link("https://example.com/notice.html", &config));
        assert!(!is_document_link("https://example.com/list.pdf?download=1", &config));
        assert!(!is_document_link("https://example.com/cause_list", &config));
    }

    #[tokio::test]
    async fn test_harvest_keeps_order_and_duplicates() {
        let page = HtmlSnapshotPage::parse(
            r#"
            <a href="/b.pdf">B</a>
            <a href="/notice.html">Notice</a>
            <a>no target</a>
            <a href="">empty</a>
            <a href="/a.pdf">A</a>
            <a href="/b.pdf">B again</a>
            "#,
            Some("https://example.com/lists/"),
        );
        let closed = page.closed_flag();

        let links = harvest(page, &HarvestConfig::default()).await;

        assert_eq!(
            links,
            vec![
                "https://example.com/b.pdf",
                "https://example.com/a.pdf",
                "https://example.com/b.pdf",
            ]
        );
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_harvest_empty_page_still_closes() {
        let page = HtmlSnapshotPage::parse("<p>No lists today</p>", None);
        let closed = page.closed_flag();

        assert!(harvest(page, &HarvestConfig::default()).await.is_empty());
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}
