//! Suggestion candidates.
//!
//! A [`RawItem`] is whatever a source supplies: a plain string, a
//! `(label, value)` pair, or an entry with optional label and value.
//! [`Candidate::from_raw`] normalizes it into a label/value pair, falling back
//! from one to the other when a field is missing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An unnormalized item from a candidate source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    /// A string used as both label and value.
    Text(String),
    /// A `[label, value]` pair.
    Pair(String, String),
    /// An entry where either field may be absent.
    Entry {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
}

impl RawItem {
    /// Create an entry item.
    pub fn entry(label: Option<&str>, value: Option<&str>) -> Self {
        Self::Entry {
            label: label.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}

impl From<&str> for RawItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<(&str, &str)> for RawItem {
    fn from((label, value): (&str, &str)) -> Self {
        Self::Pair(label.to_string(), value.to_string())
    }
}

/// A normalized suggestion: the text shown and the text committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Text displayed and matched against the input.
    pub label: String,
    /// Text written into the input on selection.
    pub value: String,
}

impl Candidate {
    /// Create a candidate with distinct label and value.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Normalize a raw item.
    ///
    /// An empty label falls back to the value and an empty value to the
    /// label. Returns `None` when both are empty.
    pub fn from_raw(item: &RawItem) -> Option<Self> {
        let (label, value) = match item {
            RawItem::Text(text) => (text.as_str(), text.as_str()),
            RawItem::Pair(label, value) => (label.as_str(), value.as_str()),
            RawItem::Entry { label, value } => (
                label.as_deref().unwrap_or_default(),
                value.as_deref().unwrap_or_default(),
            ),
        };

        match (label.is_empty(), value.is_empty()) {
            (true, true) => None,
            (true, false) => Some(Self::new(value, value)),
            (false, true) => Some(Self::new(label, label)),
            (false, false) => Some(Self::new(label, value)),
        }
    }

    /// Label length in characters.
    pub fn len(&self) -> usize {
        self.label.chars().count()
    }

    /// Whether the label is empty.
    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_item() {
        let candidate = Candidate::from_raw(&"Barn Owl".into()).unwrap();
        assert_eq!(candidate, Candidate::new("Barn Owl", "Barn Owl"));
    }

    #[test]
    fn test_pair_item() {
        let candidate = Candidate::from_raw(&("Barn Owl", "tyto-alba").into()).unwrap();
        assert_eq!(candidate.label, "Barn Owl");
        assert_eq!(candidate.value, "tyto-alba");
    }

    #[test]
    fn test_entry_fallbacks() {
        let value_only = RawItem::entry(None, Some("Kestrel"));
        assert_eq!(
            Candidate::from_raw(&value_only),
            Some(Candidate::new("Kestrel", "Kestrel"))
        );

        let label_only = RawItem::entry(Some("Merlin"), Some(""));
        assert_eq!(
            Candidate::from_raw(&label_only),
            Some(Candidate::new("Merlin", "Merlin"))
        );

        assert_eq!(Candidate::from_raw(&RawItem::entry(None, None)), None);
        assert_eq!(Candidate::from_raw(&RawItem::Text(String::new())), None);
    }

    #[test]
    fn test_length_counts_characters() {
        let candidate = Candidate::new("Pinson des arbres \u{e9}", "x");
        assert_eq!(candidate.len(), 19);
    }

    #[test]
    fn test_deserialize_mixed_items() {
        let items: Vec<RawItem> =
            serde_json::from_str(r#"["Robin", ["Wren", "troglodytes"], {"value": "Jay"}]"#)
                .unwrap();
        assert_eq!(items[0], RawItem::Text("Robin".to_string()));
        assert_eq!(
            items[1],
            RawItem::Pair("Wren".to_string(), "troglodytes".to_string())
        );
        assert_eq!(items[2], RawItem::entry(None, Some("Jay")));
    }
}
