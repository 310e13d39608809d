//! Autocomplete configuration.
//!
//! [`AutocompleteConfig`] holds every tunable, including the pluggable
//! filter, sort, data, item and replace functions. [`AutocompleteSettings`]
//! is the serializable subset, for loading from TOML or JSON files.
//!
//! # Example
//!
//! ```
//! use plumage::autocomplete::{AutocompleteConfig, AutocompleteSettings};
//!
//! let settings = AutocompleteSettings::from_toml_str(r#"
//! min_chars = 1
//! max_items = 5
//! filter = "starts_with"
//! "#).unwrap();
//!
//! let config = AutocompleteConfig::from(settings).with_auto_first(true);
//! assert_eq!(config.min_chars, 1);
//! assert!(config.auto_first);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use plumage_core::logging::targets;
use plumage_core::{Document, DomResult, NodeId};
use serde::{Deserialize, Serialize};

use super::matcher::{filter_contains, filter_starts_with, sort_by_length, Query, Segment};
use crate::accessibility::AccessibleRole;
use crate::candidate::{Candidate, RawItem};
use crate::error::{read_structured, Result};
use crate::source::CandidateSource;

/// Decides whether a candidate qualifies for the current input.
pub type FilterFn = Arc<dyn Fn(&Candidate, &Query) -> bool + Send + Sync>;

/// Orders qualifying candidates.
pub type SortFn = Arc<dyn Fn(&Candidate, &Candidate) -> Ordering + Send + Sync>;

/// Transforms a raw item before normalization. Receives the raw input text.
pub type DataFn = Arc<dyn Fn(&RawItem, &str) -> RawItem + Send + Sync>;

/// Builds the detached list item element for one suggestion.
pub type ItemFn = Arc<dyn Fn(&mut Document, &RenderItem<'_>) -> DomResult<NodeId> + Send + Sync>;

/// Commits a suggestion into the input element.
pub type ReplaceFn = Arc<dyn Fn(&mut Document, NodeId, &Candidate) -> DomResult<()> + Send + Sync>;

/// What an item renderer receives.
#[derive(Debug)]
pub struct RenderItem<'a> {
    /// The suggestion to render.
    pub candidate: &'a Candidate,
    /// The input being matched.
    pub query: &'a Query,
    /// Position in the suggestion list.
    pub index: usize,
    /// Element id the item must carry, e.g. `awesomplete_list_1_item_0`.
    pub id: &'a str,
}

/// Default item renderer.
///
/// Creates an `li` whose label has every match wrapped in `<mark>`, with
/// `role="option"`, `aria-selected="false"` and the given id.
pub fn render_item(doc: &mut Document, item: &RenderItem<'_>) -> DomResult<NodeId> {
    let li = doc.create_element("li");
    for segment in item.query.highlight(&item.candidate.label) {
        match segment {
            Segment::Plain(text) => {
                let text_node = doc.create_text(text);
                doc.append_child(li, text_node)?;
            }
            Segment::Emphasis(text) => {
                let mark = doc.create_element("mark");
                doc.set_text_content(mark, text)?;
                doc.append_child(li, mark)?;
            }
        }
    }
    if let Some(role) = AccessibleRole::ListBoxOption.aria_role() {
        doc.set_attribute(li, "role", role)?;
    }
    doc.set_attribute(li, "aria-selected", "false")?;
    doc.set_attribute(li, "id", item.id)?;
    Ok(li)
}

/// Default replace function: writes the candidate's value into the input.
pub fn replace_value(doc: &mut Document, input: NodeId, candidate: &Candidate) -> DomResult<()> {
    doc.set_value(input, &candidate.value)
}

/// Configuration for an [`Autocomplete`](super::Autocomplete).
#[derive(Clone)]
pub struct AutocompleteConfig {
    /// Minimum input length, in characters, before suggestions appear.
    pub min_chars: usize,
    /// Maximum number of suggestions shown.
    pub max_items: usize,
    /// Highlight the first suggestion whenever the list opens.
    pub auto_first: bool,
    /// Ordering of suggestions; `None` keeps source order.
    pub sort: Option<SortFn>,
    pub filter: FilterFn,
    pub data: DataFn,
    pub item: ItemFn,
    pub replace: ReplaceFn,
    /// Candidates used when the input names no list of its own.
    pub list: CandidateSource,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_chars: 2,
            max_items: 10,
            auto_first: false,
            sort: Some(Arc::new(sort_by_length)),
            filter: Arc::new(filter_contains),
            data: Arc::new(|item: &RawItem, _input: &str| item.clone()),
            item: Arc::new(render_item),
            replace: Arc::new(replace_value),
            list: CandidateSource::default(),
        }
    }
}

impl AutocompleteConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum input length using builder pattern.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set the maximum suggestion count using builder pattern.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Enable or disable auto-first using builder pattern.
    pub fn with_auto_first(mut self, auto_first: bool) -> Self {
        self.auto_first = auto_first;
        self
    }

    /// Use a custom sort comparator.
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&Candidate, &Candidate) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Keep suggestions in source order.
    pub fn without_sort(mut self) -> Self {
        self.sort = None;
        self
    }

    /// Use a custom filter.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Candidate, &Query) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    /// Use a custom data transformation.
    pub fn with_data<F>(mut self, data: F) -> Self
    where
        F: Fn(&RawItem, &str) -> RawItem + Send + Sync + 'static,
    {
        self.data = Arc::new(data);
        self
    }

    /// Use a custom item renderer.
    pub fn with_item<F>(mut self, item: F) -> Self
    where
        F: Fn(&mut Document, &RenderItem<'_>) -> DomResult<NodeId> + Send + Sync + 'static,
    {
        self.item = Arc::new(item);
        self
    }

    /// Use a custom replace function.
    pub fn with_replace<F>(mut self, replace: F) -> Self
    where
        F: Fn(&mut Document, NodeId, &Candidate) -> DomResult<()> + Send + Sync + 'static,
    {
        self.replace = Arc::new(replace);
        self
    }

    /// Set the fallback candidate source.
    pub fn with_list(mut self, list: impl Into<CandidateSource>) -> Self {
        self.list = list.into();
        self
    }

    /// Apply `data-minchars`, `data-maxitems` and `data-autofirst` overrides
    /// from the input element.
    ///
    /// Numeric overrides that fail to parse are ignored with a warning. The
    /// presence of `data-autofirst` enables auto-first.
    pub fn apply_attributes(&mut self, doc: &Document, input: NodeId) {
        if let Some(value) = parse_numeric_attribute(doc, input, "data-minchars") {
            self.min_chars = value;
        }
        if let Some(value) = parse_numeric_attribute(doc, input, "data-maxitems") {
            self.max_items = value;
        }
        if doc.has_attribute(input, "data-autofirst") {
            self.auto_first = true;
        }
    }
}

fn parse_numeric_attribute(doc: &Document, input: NodeId, name: &str) -> Option<usize> {
    let raw = doc.attribute(input, name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                target: targets::AUTOCOMPLETE,
                attribute = name,
                value = raw,
                error = %err,
                "ignoring unparsable attribute override"
            );
            None
        }
    }
}

impl fmt::Debug for AutocompleteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteConfig")
            .field("min_chars", &self.min_chars)
            .field("max_items", &self.max_items)
            .field("auto_first", &self.auto_first)
            .field("sorted", &self.sort.is_some())
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

/// Built-in filters selectable from settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Case-insensitive substring match.
    #[default]
    Contains,
    /// Case-insensitive prefix match.
    StartsWith,
}

impl FilterKind {
    fn into_filter(self) -> FilterFn {
        match self {
            Self::Contains => Arc::new(filter_contains),
            Self::StartsWith => Arc::new(filter_starts_with),
        }
    }
}

/// Serializable autocomplete settings.
///
/// Missing fields take the [`AutocompleteConfig`] defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    pub min_chars: usize,
    pub max_items: usize,
    pub auto_first: bool,
    /// Sort by length when `true`, keep source order when `false`.
    pub sort: bool,
    pub filter: FilterKind,
    /// Static candidates.
    pub list: Vec<RawItem>,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            min_chars: 2,
            max_items: 10,
            auto_first: false,
            sort: true,
            filter: FilterKind::Contains,
            list: Vec::new(),
        }
    }
}

impl AutocompleteSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load settings from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_structured(path.as_ref())
    }
}

impl From<AutocompleteSettings> for AutocompleteConfig {
    fn from(settings: AutocompleteSettings) -> Self {
        let config = Self {
            min_chars: settings.min_chars,
            max_items: settings.max_items,
            auto_first: settings.auto_first,
            filter: settings.filter.into_filter(),
            list: CandidateSource::List(settings.list),
            ..Self::default()
        };
        if settings.sort {
            config
        } else {
            config.without_sort()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AutocompleteConfig::default();
        assert_eq!(config.min_chars, 2);
        assert_eq!(config.max_items, 10);
        assert!(!config.auto_first);
        assert!(config.sort.is_some());
        assert_eq!(config.list, CandidateSource::List(Vec::new()));
    }

    #[test]
    fn test_builder() {
        let config = AutocompleteConfig::new()
            .with_min_chars(0)
            .with_max_items(3)
            .with_auto_first(true)
            .without_sort()
            .with_list(vec!["Robin", "Wren"]);

        assert_eq!(config.min_chars, 0);
        assert_eq!(config.max_items, 3);
        assert!(config.auto_first);
        assert!(config.sort.is_none());
        assert_eq!(
            config.list,
            CandidateSource::List(vec![RawItem::from("Robin"), RawItem::from("Wren")])
        );
    }

    #[test]
    fn test_attribute_overrides() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "data-minchars", "1").unwrap();
        doc.set_attribute(input, "data-maxitems", "lots").unwrap();
        doc.set_attribute(input, "data-autofirst", "").unwrap();

        let mut config = AutocompleteConfig::default();
        config.apply_attributes(&doc, input);

        assert_eq!(config.min_chars, 1);
        assert_eq!(config.max_items, 10);
        assert!(config.auto_first);
    }

    #[test]
    fn test_render_item_marks_matches() {
        let mut doc = Document::new();
        let candidate = Candidate::new("Barn Owl", "Barn Owl");
        let query = Query::new("ow");
        let li = render_item(
            &mut doc,
            &RenderItem {
                candidate: &candidate,
                query: &query,
                index: 0,
                id: "awesomplete_list_1_item_0",
            },
        )
        .unwrap();

        assert_eq!(doc.text_content(li).unwrap(), "Barn Owl");
        assert_eq!(doc.attribute(li, "aria-selected"), Some("false"));
        assert_eq!(doc.attribute(li, "id"), Some("awesomplete_list_1_item_0"));
        assert_eq!(doc.attribute(li, "role"), Some("option"));

        let children = doc.children(li).unwrap().to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(doc.tag_name(children[1]).unwrap(), "mark");
        assert_eq!(doc.text_content(children[1]).unwrap(), "Ow");
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = AutocompleteSettings::from_toml_str(
            r#"
            min_chars = 0
            sort = false
            filter = "starts_with"
            list = ["Robin", ["Wren", "troglodytes"]]
            "#,
        )
        .unwrap();

        assert_eq!(settings.min_chars, 0);
        assert_eq!(settings.max_items, 10);
        assert_eq!(settings.filter, FilterKind::StartsWith);
        assert_eq!(settings.list.len(), 2);

        let config = AutocompleteConfig::from(settings);
        assert!(config.sort.is_none());
        let query = Query::new("wr");
        assert!((config.filter)(&Candidate::new("Wren", "x"), &query));
        assert!(!(config.filter)(&Candidate::new("Swift wren", "x"), &query));
    }

    #[test]
    fn test_settings_from_json() {
        let settings =
            AutocompleteSettings::from_json_str(r#"{"max_items": 4, "auto_first": true}"#).unwrap();
        assert_eq!(settings.max_items, 4);
        assert!(settings.auto_first);
        assert!(settings.sort);
    }

    #[test]
    fn test_settings_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autocomplete.toml");
        std::fs::write(&path, "max_items = 3\n").unwrap();

        let settings = AutocompleteSettings::load(&path).unwrap();
        assert_eq!(settings.max_items, 3);

        assert!(AutocompleteSettings::from_toml_str("max_items = \"many\"").is_err());
    }
}
