//! Where candidates come from.

use plumage_core::logging::targets;
use plumage_core::{Document, NodeId};

use crate::candidate::RawItem;

/// A candidate source, resolved into raw items on assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// An explicit list of items.
    List(Vec<RawItem>),
    /// Comma-separated values, whitespace around commas trimmed and empty
    /// entries dropped.
    Csv(String),
    /// A CSS selector (usually `#id`) naming an element whose children are
    /// the candidates, such as a `datalist` or `ul`.
    ElementRef(String),
}

impl CandidateSource {
    /// Classify a string: a comma makes it CSV, anything else is a selector.
    pub fn parse(text: &str) -> Self {
        if text.contains(',') {
            Self::Csv(text.to_string())
        } else {
            Self::ElementRef(text.to_string())
        }
    }

    /// Resolve into raw items.
    ///
    /// Returns `None` when an element reference matches nothing or fails to
    /// parse; callers keep their previous items in that case.
    pub fn resolve(&self, doc: &Document) -> Option<Vec<RawItem>> {
        match self {
            Self::List(items) => Some(items.clone()),
            Self::Csv(text) => Some(
                text.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| RawItem::Text(part.to_string()))
                    .collect(),
            ),
            Self::ElementRef(selector) => match doc.query_selector(selector) {
                Ok(Some(element)) => Some(items_from_element(doc, element)),
                Ok(None) => {
                    tracing::warn!(target: targets::AUTOCOMPLETE, %selector, "list element not found");
                    None
                }
                Err(err) => {
                    tracing::warn!(target: targets::AUTOCOMPLETE, %selector, error = %err, "invalid list selector");
                    None
                }
            },
        }
    }
}

impl Default for CandidateSource {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<Vec<RawItem>> for CandidateSource {
    fn from(items: Vec<RawItem>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for CandidateSource {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(RawItem::from).collect())
    }
}

impl From<&str> for CandidateSource {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// Read the enabled children of a list element as label/value entries.
fn items_from_element(doc: &Document, element: NodeId) -> Vec<RawItem> {
    doc.element_children(element)
        .unwrap_or_default()
        .into_iter()
        .filter(|&child| !doc.has_attribute(child, "disabled"))
        .filter_map(|child| {
            let text = doc.text_content(child).ok()?.trim().to_string();
            let value = match doc.value(child) {
                "" => text.clone(),
                value => value.to_string(),
            };
            if value.is_empty() {
                return None;
            }
            let label = doc
                .attribute(child, "label")
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or(text);
            Some(RawItem::Entry {
                label: Some(label),
                value: Some(value),
            })
        })
        .collect()
}
