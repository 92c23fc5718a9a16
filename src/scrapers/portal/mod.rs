//! Cause list portal automation.
//!
//! The portal's markup is not under our control and its element identifiers
//! change without notice, so every lookup here is heuristic and fail-soft:
//! a missing control or unmatched option is logged and skipped, never raised.
//!
//! [`FormPage`] is the seam between the navigation/harvest logic and the
//! thing being driven. The live implementation is
//! [`crate::scrapers::browser::ChromePage`]; [`HtmlSnapshotPage`] works on
//! saved HTML.

mod harvest;
mod navigator;
mod snapshot;

pub use harvest::{harvest, is_document_link, HarvestConfig};
pub use navigator::{fill_dates, navigate, select_by_label, submit_form, FormConfig};
pub use snapshot::HtmlSnapshotPage;

use std::time::Duration;

use async_trait::async_trait;

/// An `<option>` discovered in a dropdown, paired with its handle.
#[derive(Debug, Clone)]
pub struct DropdownOption<E> {
    pub text: String,
    pub handle: E,
}

/// A button or submit input that may trigger the search.
#[derive(Debug, Clone)]
pub struct SubmitCandidate<E> {
    /// Visible text (empty for `<input type="submit">`).
    pub text: String,
    /// `value` attribute, if any.
    pub value: Option<String>,
    pub handle: E,
}

impl<E> SubmitCandidate<E> {
    /// Label used for keyword matching: visible text, or the value when the text is empty.
    pub fn label(&self) -> String {
        let text = self.text.trim();
        if text.is_empty() {
            self.value.as_deref().unwrap_or_default().trim().to_lowercase()
        } else {
            text.to_lowercase()
        }
    }
}

/// A rendered page that the navigator can drive and the harvester can read.
///
/// Lookups return `None` or an empty list when nothing matches; only
/// interactions report errors, and callers treat those as recoverable.
#[async_trait]
pub trait FormPage: Send + Sync {
    /// Handle to an element on the page.
    type Element: Send + Sync;

    /// Find an element by its `id` attribute.
    async fn find_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Find the first element with the given `name` attribute.
    async fn find_by_name(&self, name: &str) -> Option<Self::Element>;

    /// Options of a dropdown, in document order.
    async fn options(&self, select: &Self::Element) -> Vec<DropdownOption<Self::Element>>;

    /// Make `option` the selected value of its dropdown.
    async fn choose(&self, option: &Self::Element) -> anyhow::Result<()>;

    /// Every `<input>` whose `id` or `name` contains `token`, in document order.
    async fn inputs_matching(&self, token: &str) -> Vec<Self::Element>;

    /// Clear an input and type `value` into it.
    async fn fill(&self, input: &Self::Element, value: &str) -> anyhow::Result<()>;

    /// Buttons and submit inputs, in document order.
    async fn submit_candidates(&self) -> Vec<SubmitCandidate<Self::Element>>;

    /// Click an element.
    async fn activate(&self, element: &Self::Element) -> anyhow::Result<()>;

    /// Wait until at least one anchor exists. Returns false on timeout.
    async fn wait_for_anchor(&self, timeout: Duration) -> bool;

    /// Resolved `href` of every anchor, in document order.
    /// `None` marks an anchor whose target could not be read.
    async fn anchor_hrefs(&self) -> Vec<Option<String>>;

    /// Release the underlying session. Must be safe to call more than once.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, value: Option<&str>) -> SubmitCandidate<()> {
        SubmitCandidate {
            text: text.to_string(),
            value: value.map(str::to_string),
            handle: (),
        }
    }

    #[test]
    fn label_prefers_visible_text() {
        assert_eq!(candidate(" Search ", Some("go")).label(), "search");
    }

    #[test]
    fn label_falls_back_to_value() {
        assert_eq!(candidate("", Some("GET LIST")).label(), "get list");
        assert_eq!(candidate("   ", None).label(), "");
    }
}
