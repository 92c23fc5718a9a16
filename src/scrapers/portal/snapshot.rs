//! A [`FormPage`] backed by a saved HTML document.
//!
//! Used to harvest links from a results page saved out of a browser, and to
//! exercise the navigator without launching Chrome. Form interactions only
//! update in-memory state; nothing is submitted anywhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{DropdownOption, FormPage, SubmitCandidate};

/// Form controls and links extracted from the document, in document order.
#[derive(Debug, Clone)]
struct SnapshotElement {
    tag: String,
    id: Option<String>,
    name: Option<String>,
    input_type: Option<String>,
    text: String,
    value: Option<String>,
    href: Option<String>,
    /// For `<option>`: index of the enclosing `<select>`.
    parent: Option<usize>,
    /// For `<option>`: carries the `selected` attribute.
    preselected: bool,
}

#[derive(Debug, Default)]
struct SnapshotState {
    /// select index -> chosen option index
    selected: HashMap<usize, usize>,
    /// input index -> current value
    values: HashMap<usize, String>,
    /// labels of clicked elements, in click order
    activated: Vec<String>,
}

/// Static page parsed from HTML.
pub struct HtmlSnapshotPage {
    elements: Vec<SnapshotElement>,
    state: Mutex<SnapshotState>,
    closed: Arc<AtomicBool>,
}

impl HtmlSnapshotPage {
    /// Parse `html`. Relative links are resolved against `base_url` when given.
    pub fn parse(html: &str, base_url: Option<&str>) -> Self {
        let base = base_url.and_then(|b| Url::parse(b).ok());
        let document = Html::parse_document(html);
        let selector = Selector::parse("select, option, input, button, a").unwrap();

        let refs: Vec<ElementRef> = document.select(&selector).collect();
        let index_of: HashMap<_, usize> = refs.iter().enumerate().map(|(i, r)| (r.id(), i)).collect();

        let elements = refs
            .iter()
            .map(|el| {
                let attrs = el.value();
                let tag = attrs.name().to_string();
                let parent = if tag == "option" {
                    el.ancestors()
                        .find(|n| n.value().as_element().is_some_and(|e| e.name() == "select"))
                        .and_then(|n| index_of.get(&n.id()).copied())
                } else {
                    None
                };
                let href = if tag == "a" {
                    attrs
                        .attr("href")
                        .map(str::trim)
                        .filter(|h| !h.is_empty())
                        .map(|h| resolve_href(base.as_ref(), h))
                } else {
                    None
                };

                SnapshotElement {
                    id: attrs.attr("id").map(str::to_string),
                    name: attrs.attr("name").map(str::to_string),
                    input_type: attrs.attr("type").map(|t| t.to_lowercase()),
                    text: el.text().collect::<String>().trim().to_string(),
                    value: attrs.attr("value").map(str::to_string),
                    preselected: attrs.attr("selected").is_some(),
                    href,
                    parent,
                    tag,
                }
            })
            .collect::<Vec<_>>();

        let mut state = SnapshotState::default();
        for (i, el) in elements.iter().enumerate() {
            if el.tag == "input" {
                state
                    .values
                    .insert(i, el.value.clone().unwrap_or_default());
            }
            if let Some(select) = el.parent {
                let first = !state.selected.contains_key(&select);
                if first || el.preselected {
                    state.selected.insert(select, i);
                }
            }
        }

        Self {
            elements,
            state: Mutex::new(state),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Text of the option currently selected in the dropdown with this id or name.
    pub fn selected_text(&self, field: &str) -> Option<String> {
        let select = self.lookup(field)?;
        let state = self.state.lock().ok()?;
        let option = *state.selected.get(&select)?;
        Some(self.elements[option].text.clone())
    }

    /// Current value of the input with this id or name.
    pub fn input_value(&self, field: &str) -> Option<String> {
        let input = self.lookup(field)?;
        self.state.lock().ok()?.values.get(&input).cloned()
    }

    /// Lower-cased labels of the elements clicked so far.
    pub fn activated(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.activated.clone())
            .unwrap_or_default()
    }

    /// Shared flag set once the page is closed; stays readable after the page is consumed.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }

    fn lookup(&self, field: &str) -> Option<usize> {
        self.position(|el| el.id.as_deref() == Some(field))
            .or_else(|| self.position(|el| el.name.as_deref() == Some(field)))
    }

    fn position(&self, pred: impl Fn(&SnapshotElement) -> bool) -> Option<usize> {
        self.elements.iter().position(pred)
    }

    fn label(&self, index: usize) -> String {
        let el = &self.elements[index];
        SubmitCandidate {
            text: el.text.clone(),
            value: el.value.clone(),
            handle: index,
        }
        .label()
    }
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

#[async_trait]
impl FormPage for HtmlSnapshotPage {
    type Element = usize;

    async fn find_by_id(&self, id: &str) -> Option<usize> {
        self.position(|el| el.id.as_deref() == Some(id))
    }

    async fn find_by_name(&self, name: &str) -> Option<usize> {
        self.position(|el| el.name.as_deref() == Some(name))
    }

    async fn options(&self, select: &usize) -> Vec<DropdownOption<usize>> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.parent == Some(*select))
            .map(|(i, el)| DropdownOption {
                text: el.text.clone(),
                handle: i,
            })
            .collect()
    }

    async fn choose(&self, option: &usize) -> anyhow::Result<()> {
        let select = self
            .elements
            .get(*option)
            .and_then(|el| el.parent)
            .ok_or_else(|| anyhow::anyhow!("element {} is not a dropdown option", option))?;
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot state poisoned"))?;
        state.selected.insert(select, *option);
        Ok(())
    }

    async fn inputs_matching(&self, token: &str) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.tag == "input")
            .filter(|(_, el)| {
                el.id.as_deref().is_some_and(|id| id.contains(token))
                    || el.name.as_deref().is_some_and(|n| n.contains(token))
            })
            .map(|(i, _)| i)
            .collect()
    }

    async fn fill(&self, input: &usize, value: &str) -> anyhow::Result<()> {
        if self.elements.get(*input).map(|el| el.tag.as_str()) != Some("input") {
            anyhow::bail!("element {} is not an input", input);
        }
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot state poisoned"))?;
        state.values.insert(*input, value.to_string());
        Ok(())
    }

    async fn submit_candidates(&self) -> Vec<SubmitCandidate<usize>> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| {
                el.tag == "button"
                    || (el.tag == "input" && el.input_type.as_deref() == Some("submit"))
            })
            .map(|(i, el)| SubmitCandidate {
                text: if el.tag == "button" { el.text.clone() } else { String::new() },
                value: el.value.clone(),
                handle: i,
            })
            .collect()
    }

    async fn activate(&self, element: &usize) -> anyhow::Result<()> {
        if *element >= self.elements.len() {
            anyhow::bail!("no element {}", element);
        }
        let label = self.label(*element);
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot state poisoned"))?;
        state.activated.push(label);
        Ok(())
    }

    async fn wait_for_anchor(&self, _timeout: Duration) -> bool {
        self.elements.iter().any(|el| el.tag == "a")
    }

    async fn anchor_hrefs(&self) -> Vec<Option<String>> {
        self.elements
            .iter()
            .filter(|el| el.tag == "a")
            .map(|el| el.href.clone())
            .collect()
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
