//! Form navigation: cascading dropdowns, date fields and submission.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::FormPage;
use crate::models::SelectionCriteria;

/// Element identifiers and timings for the cause list form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// State dropdown id/name.
    #[serde(default = "default_state_field")]
    pub state_field: String,
    /// District dropdown id/name.
    #[serde(default = "default_district_field")]
    pub district_field: String,
    /// Court complex dropdown id/name.
    #[serde(default = "default_complex_field")]
    pub complex_field: String,
    /// Court dropdown id/name.
    #[serde(default = "default_court_field")]
    pub court_field: String,
    /// Inputs whose id or name contains this token receive the date.
    #[serde(default = "default_date_token")]
    pub date_token: String,
    /// A button whose label contains any of these is the search button.
    #[serde(default = "default_submit_keywords")]
    pub submit_keywords: Vec<String>,
    /// Seconds to wait for results after submitting.
    #[serde(default = "default_results_timeout")]
    pub results_timeout: u64,
    /// Pause after each dropdown choice so dependent dropdowns can repopulate.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_state_field() -> String {
    "state".to_string()
}

fn default_district_field() -> String {
    "district".to_string()
}

fn default_complex_field() -> String {
    "courtComplex".to_string()
}

fn default_court_field() -> String {
    "court".to_string()
}

fn default_date_token() -> String {
    "date".to_string()
}

fn default_submit_keywords() -> Vec<String> {
    ["search", "fetch", "get", "submit"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_results_timeout() -> u64 {
    15
}

fn default_settle_ms() -> u64 {
    1000
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            state_field: default_state_field(),
            district_field: default_district_field(),
            complex_field: default_complex_field(),
            court_field: default_court_field(),
            date_token: default_date_token(),
            submit_keywords: default_submit_keywords(),
            results_timeout: default_results_timeout(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Fill the form from `criteria`, submit it and wait for results.
///
/// Never fails: each step that cannot be completed is logged and skipped,
/// leaving the page in whatever state it reached.
pub async fn navigate<P: FormPage>(page: &P, criteria: &SelectionCriteria, config: &FormConfig) {
    let settle = Duration::from_millis(config.settle_ms);

    let mut fields = vec![
        (config.state_field.as_str(), criteria.state.as_str()),
        (config.district_field.as_str(), criteria.district.as_str()),
        (config.complex_field.as_str(), criteria.court_complex.as_str()),
    ];
    if let Some(court) = criteria.court_filter() {
        fields.push((config.court_field.as_str(), court));
    }

    for (field, label) in fields {
        if select_by_label(page, field, label).await && !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
    }

    let filled = fill_dates(page, &config.date_token, &criteria.date).await;
    debug!("Filled {} date field(s)", filled);

    if submit_form(page, &config.submit_keywords).await {
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
    } else {
        warn!("No search button found; harvesting the page as-is");
    }

    let timeout = Duration::from_secs(config.results_timeout);
    if !page.wait_for_anchor(timeout).await {
        warn!(
            "No links appeared within {}s; harvesting the page as-is",
            config.results_timeout
        );
    }
}

/// Select the first option of dropdown `field` whose text contains `label`.
///
/// The dropdown is looked up by id, then by name. Matching is on trimmed,
/// lower-cased text. Returns true if an option was chosen; otherwise the
/// dropdown is left unchanged.
pub async fn select_by_label<P: FormPage>(page: &P, field: &str, label: &str) -> bool {
    let select = match page.find_by_id(field).await {
        Some(el) => el,
        None => match page.find_by_name(field).await {
            Some(el) => el,
            None => {
                debug!("Dropdown '{}' not found", field);
                return false;
            }
        },
    };

    let wanted = label.trim().to_lowercase();
    let options = page.options(&select).await;

    let Some(option) = options
        .iter()
        .find(|opt| opt.text.trim().to_lowercase().contains(&wanted))
    else {
        debug!(
            "No option of '{}' matches '{}' ({} options)",
            field,
            label,
            options.len()
        );
        return false;
    };

    match page.choose(&option.handle).await {
        Ok(()) => {
            info!("Selected '{}' for {}", option.text.trim(), field);
            true
        }
        Err(e) => {
            warn!("Could not select '{}' for {}: {}", option.text.trim(), field, e);
            false
        }
    }
}

/// Type `value` into every input whose id or name contains `token`.
/// Returns the number of inputs filled.
pub async fn fill_dates<P: FormPage>(page: &P, token: &str, value: &str) -> usize {
    let mut filled = 0;
    for input in page.inputs_matching(token).await {
        match page.fill(&input, value).await {
            Ok(()) => filled += 1,
            Err(e) => debug!("Could not fill date input: {}", e),
        }
    }
    filled
}

/// Click the first button whose label contains one of `keywords`.
/// Returns true if a button was clicked.
pub async fn submit_form<P: FormPage>(page: &P, keywords: &[String]) -> bool {
    for candidate in page.submit_candidates().await {
        let label = candidate.label();
        if !keywords.iter().any(|k| label.contains(&k.to_lowercase())) {
            continue;
        }

        return match page.activate(&candidate.handle).await {
            Ok(()) => {
                info!("Submitted form via '{}'", label);
                true
            }
            Err(e) => {
                warn!("Could not click '{}': {}", label, e);
                false
            }
        };
    }
    false
}
