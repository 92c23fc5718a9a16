//! Full pipeline run.

use std::path::PathBuf;

use console::style;

use causelist::config::expand_path;
use causelist::{CauseListFetcher, SelectionCriteria, Settings};

use crate::cli::icons::{info, success, warn};
use crate::cli::progress::FetchProgress;

/// Fill the form, harvest links and download every document.
pub async fn cmd_fetch(
    settings: Settings,
    criteria: SelectionCriteria,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    criteria.validate()?;

    let dest = match output {
        Some(dir) => expand_path(&dir),
        None => settings.resolved_output_dir(),
    };

    eprintln!(
        "{} Fetching cause lists for {} / {} / {} / {} on {}",
        info(),
        criteria.state,
        criteria.district,
        criteria.court_complex,
        criteria.court_or_all(),
        criteria.date
    );

    let fetcher = CauseListFetcher::new(settings);
    let mut progress = FetchProgress::new();
    let result = fetcher.fetch(&criteria, &dest, &mut progress).await;
    progress.finish();
    let saved = result?;

    if saved.is_empty() && progress.failures() == 0 {
        eprintln!("{} No PDFs found for the given inputs.", warn());
        return Ok(());
    }

    if !saved.is_empty() {
        eprintln!(
            "{} Downloaded {} PDFs to {}",
            success(),
            saved.len(),
            dest.display()
        );
        for path in &saved {
            eprintln!("  {} {}", style("→").dim(), path.display());
        }
    }
    if progress.failures() > 0 {
        eprintln!(
            "{} {} document(s) could not be downloaded",
            warn(),
            progress.failures()
        );
    }

    Ok(())
}
