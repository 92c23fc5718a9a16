//! Link harvesting without downloads.

use std::path::Path;

use anyhow::Context;

use causelist::scrapers::portal::harvest;
use causelist::scrapers::HtmlSnapshotPage;
use causelist::{CauseListFetcher, SelectionCriteria, Settings};

use crate::cli::icons::warn;

/// Drive the portal form and print the harvested links.
pub async fn cmd_links(settings: Settings, criteria: SelectionCriteria) -> anyhow::Result<()> {
    let fetcher = CauseListFetcher::new(settings);
    let links = fetcher.collect_links(&criteria).await?;
    print_links(&links);
    Ok(())
}

/// Harvest a saved results page.
pub async fn cmd_links_offline(
    settings: &Settings,
    file: &Path,
    base: Option<&str>,
) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let page = HtmlSnapshotPage::parse(&html, base);
    let links = harvest(page, &settings.harvest).await;
    print_links(&links);
    Ok(())
}

fn print_links(links: &[String]) {
    if links.is_empty() {
        eprintln!("{} No PDFs found for the given inputs.", warn());
        return;
    }
    for link in links {
        println!("{}", link);
    }
}
