//! [`FormPage`] over a live chromiumoxide tab.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::{Element, Page};
use tracing::debug;

use super::{BrowserEngineConfig, BrowserSession};
use crate::scrapers::portal::{DropdownOption, FormPage, SubmitCandidate};

/// Selects an `<option>` and notifies the page, so dependent dropdowns reload.
const CHOOSE_OPTION_JS: &str = r#"
function() {
    this.selected = true;
    const select = this.closest('select');
    if (select) {
        select.dispatchEvent(new Event('input', { bubbles: true }));
        select.dispatchEvent(new Event('change', { bubbles: true }));
    }
}
"#;

const CLEAR_INPUT_JS: &str = "function() { this.value = ''; }";

const CLICK_JS: &str = "function() { this.click(); }";

/// Polling interval while waiting for results.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A tab in a browser session. Closing it shuts the session down.
pub struct ChromePage {
    page: Option<Page>,
    session: Option<BrowserSession>,
}

impl ChromePage {
    /// Start a browser session and open `url` in it.
    pub async fn open(config: &BrowserEngineConfig, url: &str) -> Result<Self> {
        let session = BrowserSession::start(config).await?;
        match session.open_page(url).await {
            Ok(page) => Ok(Self {
                page: Some(page),
                session: Some(session),
            }),
            Err(e) => {
                session.shutdown().await;
                Err(e)
            }
        }
    }

    fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    async fn find_one(&self, selector: String) -> Option<Element> {
        self.page()?.find_element(selector).await.ok()
    }

    async fn find_all(&self, selector: String) -> Vec<Element> {
        match self.page() {
            Some(page) => page.find_elements(selector).await.unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

/// CSS attribute selector with the value quoted.
fn attr_selector(tag: &str, attr: &str, op: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{}[{}{}\"{}\"]", tag, attr, op, escaped)
}

async fn text_of(element: &Element) -> String {
    element.inner_text().await.ok().flatten().unwrap_or_default()
}

#[async_trait]
impl FormPage for ChromePage {
    type Element = Element;

    async fn find_by_id(&self, id: &str) -> Option<Element> {
        self.find_one(attr_selector("", "id", "=", id)).await
    }

    async fn find_by_name(&self, name: &str) -> Option<Element> {
        self.find_one(attr_selector("", "name", "=", name)).await
    }

    async fn options(&self, select: &Element) -> Vec<DropdownOption<Element>> {
        let elements = select.find_elements("option").await.unwrap_or_default();
        let mut options = Vec::with_capacity(elements.len());
        for handle in elements {
            let text = text_of(&handle).await;
            options.push(DropdownOption { text, handle });
        }
        options
    }

    async fn choose(&self, option: &Element) -> Result<()> {
        option.call_js_fn(CHOOSE_OPTION_JS, false).await?;
        Ok(())
    }

    async fn inputs_matching(&self, token: &str) -> Vec<Element> {
        let selector = format!(
            "{}, {}",
            attr_selector("input", "id", "*=", token),
            attr_selector("input", "name", "*=", token)
        );
        self.find_all(selector).await
    }

    async fn fill(&self, input: &Element, value: &str) -> Result<()> {
        input.call_js_fn(CLEAR_INPUT_JS, false).await?;

        let typed = match input.focus().await {
            Ok(el) => el.type_str(value).await.map(|_| ()),
            Err(e) => Err(e),
        };

        // Key events on a read-only date picker succeed without changing the
        // value, so check what the field holds before trusting the typing.
        let current = match typed {
            Ok(()) => input
                .property("value")
                .await
                .ok()
                .flatten()
                .and_then(|v| v.as_str().map(str::to_string)),
            Err(e) => {
                debug!("Typing into date input failed ({}), assigning value", e);
                None
            }
        };

        if !holds_value(current.as_deref(), value) {
            debug!("Date input holds {:?} after typing, assigning value", current);
            let assign = format!(
                "function() {{ this.value = {}; \
                 this.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 this.dispatchEvent(new Event('change', {{ bubbles: true }})); }}",
                serde_json::to_string(value)?
            );
            input.call_js_fn(assign, false).await?;
        }

        Ok(())
    }

    async fn submit_candidates(&self) -> Vec<SubmitCandidate<Element>> {
        let elements = self.find_all("button, input[type=\"submit\"]".to_string()).await;
        let mut candidates = Vec::with_capacity(elements.len());
        for handle in elements {
            let text = text_of(&handle).await;
            let value = handle.attribute("value").await.ok().flatten();
            candidates.push(SubmitCandidate {
                text,
                value,
                handle,
            });
        }
        candidates
    }

    async fn activate(&self, element: &Element) -> Result<()> {
        if let Err(e) = element.click().await {
            debug!("Mouse click failed ({}), clicking via script", e);
            element.call_js_fn(CLICK_JS, false).await?;
        }
        Ok(())
    }

    async fn wait_for_anchor(&self, timeout: Duration) -> bool {
        let Some(page) = self.page() else {
            return false;
        };

        let poll = async {
            loop {
                if page.find_element("a").await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll).await.is_ok()
    }

    async fn anchor_hrefs(&self) -> Vec<Option<String>> {
        let anchors = self.find_all("a".to_string()).await;
        let mut hrefs = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            let href = match anchor.property("href").await {
                Ok(Some(value)) => value.as_str().map(str::to_string),
                Ok(None) => None,
                Err(e) => {
                    debug!("Could not read anchor href: {}", e);
                    None
                }
            };
            hrefs.push(href);
        }
        hrefs
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Page close failed: {}", e);
            }
        }
        if let Some(session) = self.session.take() {
            session.shutdown().await;
        }
    }
}

/// Whether an input read back as `current` ended up holding `wanted`.
fn holds_value(current: Option<&str>, wanted: &str) -> bool {
    current == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_keystrokes_need_assignment() {
        assert!(holds_value(Some("2024-05-01"), "2024-05-01"));
        // read-only picker: cleared, typing had no effect
        assert!(!holds_value(Some(""), "2024-05-01"));
        // masked input that reformatted or truncated the text
        assert!(!holds_value(Some("2024-05"), "2024-05-01"));
        assert!(!holds_value(None, "2024-05-01"));
    }

    #[test]
    fn attr_selector_quotes_values() {
        assert_eq!(attr_selector("", "id", "=", "state"), "[id=\"state\"]");
        assert_eq!(
            attr_selector("input", "name", "*=", "da\"te"),
            "input[name*=\"da\\\"te\"]"
        );
    }
}
