//! The autocomplete widget.

use std::fmt;

use plumage_core::logging::{span_names, targets};
use plumage_core::{Cancelable, Document, EventKind, ListenerOwner, NodeId, PerfSpan, Signal};

use super::config::{AutocompleteConfig, RenderItem};
use super::events::{CloseReason, Key, MouseButton, SelectEvent};
use super::matcher::Query;
use super::registry::Registry;
use crate::accessibility::AccessibleRole;
use crate::candidate::{Candidate, RawItem};
use crate::error::{Error, Result};
use crate::source::CandidateSource;

/// Attributes the widget adds to its input and removes again on destroy.
const INPUT_ATTRIBUTES: [&str; 5] = [
    "autocomplete",
    "aria-autocomplete",
    "aria-owns",
    "aria-activedescendant",
    "role",
];

/// An autocomplete widget attached to an input element.
///
/// Attaching wraps the input in a `div.awesomplete` container holding a
/// hidden suggestion list and a live status region. The host forwards DOM
/// events to the `handle_*` methods; the widget updates the document and
/// emits its signals synchronously.
///
/// # States
///
/// The list is either closed (hidden, nothing highlighted) or open (visible,
/// at most one item highlighted). Evaluating input with at least one match
/// opens it; no matches, blur, Escape, form submission or a committed
/// selection close it.
///
/// # Signals
///
/// - `opened`: the list became visible
/// - `closed(CloseReason)`: the list was hidden
/// - `highlighted(Candidate)`: an item was highlighted
/// - `selecting(Cancelable<SelectEvent>)`: a selection is about to be
///   committed; any slot may veto it
/// - `selected(Candidate)`: a selection was committed
///
/// # Example
///
/// ```
/// use plumage::autocomplete::{Autocomplete, AutocompleteConfig, Registry};
/// use plumage_core::Document;
///
/// let mut doc = Document::new();
/// let input = doc.create_element("input");
/// doc.append_child(doc.root(), input).unwrap();
///
/// let registry = Registry::new();
/// let config = AutocompleteConfig::new().with_list(vec!["Barn Owl", "Snowy Owl", "Wren"]);
/// let mut widget = Autocomplete::attach(&mut doc, &registry, input, config).unwrap();
///
/// doc.set_value(input, "owl").unwrap();
/// widget.handle_input(&mut doc).unwrap();
/// assert!(widget.is_open());
/// assert_eq!(widget.suggestions().len(), 2);
/// ```
pub struct Autocomplete {
    instance: u64,
    registry: Registry,
    config: AutocompleteConfig,

    input: NodeId,
    container: NodeId,
    list: NodeId,
    status: NodeId,
    form: Option<NodeId>,

    /// Raw items from the resolved candidate source.
    items: Vec<RawItem>,
    /// Suggestions rendered by the last evaluation, in list order.
    suggestions: Vec<Candidate>,
    index: Option<usize>,
    is_open: bool,

    /// Emitted when the list becomes visible.
    pub opened: Signal<()>,
    /// Emitted when the list is hidden.
    pub closed: Signal<CloseReason>,
    /// Emitted when an item is highlighted.
    pub highlighted: Signal<Candidate>,
    /// Emitted before a selection is committed; cancel to veto.
    pub selecting: Signal<Cancelable<SelectEvent>>,
    /// Emitted after a selection is committed.
    pub selected: Signal<Candidate>,
}

impl Autocomplete {
    /// Attach a widget to `input`.
    ///
    /// The input must be an element with a parent. `data-minchars`,
    /// `data-maxitems` and `data-autofirst` attributes on the input override
    /// the corresponding config values. The candidate source is, in order of
    /// preference: the element named by the input's `list` attribute (which
    /// is then removed), the input's `data-list` attribute, `config.list`.
    #[tracing::instrument(skip(doc, registry, config), target = "plumage::autocomplete", level = "debug")]
    pub fn attach(
        doc: &mut Document,
        registry: &Registry,
        input: NodeId,
        mut config: AutocompleteConfig,
    ) -> Result<Self> {
        let tag = doc.tag_name(input)?;
        if doc.parent(input)?.is_none() {
            return Err(Error::attach(format!("<{tag}> has no parent element")));
        }
        config.apply_attributes(doc, input);

        let instance = registry.register();
        let list_id = format!("awesomplete_list_{instance}");

        doc.set_attribute(input, "autocomplete", "off")?;
        doc.set_attribute(input, "aria-autocomplete", "list")?;
        doc.set_attribute(input, "aria-owns", &list_id)?;
        set_role(doc, input, AccessibleRole::ComboBox)?;

        let container = doc.create_element("div");
        doc.add_class(container, "awesomplete")?;
        doc.wrap(input, container)?;

        let list = doc.create_element("ul");
        doc.set_attribute(list, "hidden", "")?;
        set_role(doc, list, AccessibleRole::ListBox)?;
        doc.set_attribute(list, "id", &list_id)?;
        doc.append_child(container, list)?;

        let status = doc.create_element("span");
        doc.add_class(status, "visually-hidden")?;
        set_role(doc, status, AccessibleRole::Status)?;
        doc.set_attribute(status, "aria-live", "assertive")?;
        doc.set_attribute(status, "aria-atomic", "true")?;
        let prompt = if config.min_chars == 0 {
            "Begin typing for results.".to_string()
        } else {
            format!("Type {} or more characters for results.", config.min_chars)
        };
        doc.set_text_content(status, &prompt)?;
        doc.append_child(container, status)?;

        let owner = ListenerOwner(instance);
        doc.bind(input, owner, &[EventKind::Input, EventKind::Blur, EventKind::KeyDown])?;
        let form = doc.closest(input, "form");
        if let Some(form) = form {
            doc.bind(form, owner, &[EventKind::Submit])?;
        }
        doc.bind(list, owner, &[EventKind::MouseDown])?;

        let source = if let Some(id) = doc.remove_attribute(input, "list")? {
            CandidateSource::ElementRef(format!("#{id}"))
        } else if let Some(data_list) = doc
            .attribute(input, "data-list")
            .filter(|text| !text.trim().is_empty())
        {
            CandidateSource::parse(data_list)
        } else {
            config.list.clone()
        };

        let mut widget = Self {
            instance,
            registry: registry.clone(),
            config,
            input,
            container,
            list,
            status,
            form,
            items: Vec::new(),
            suggestions: Vec::new(),
            index: None,
            is_open: false,
            opened: Signal::new(),
            closed: Signal::new(),
            highlighted: Signal::new(),
            selecting: Signal::new(),
            selected: Signal::new(),
        };
        widget.set_list(doc, source)?;

        tracing::debug!(target: targets::AUTOCOMPLETE, instance, items = widget.items.len(), "attached");
        Ok(widget)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Instance number assigned by the registry.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// The input element.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// The `div.awesomplete` wrapper.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The suggestion list element.
    pub fn list(&self) -> NodeId {
        self.list
    }

    /// The live status region.
    pub fn status(&self) -> NodeId {
        self.status
    }

    /// The form enclosing the input at attach time.
    pub fn form(&self) -> Option<NodeId> {
        self.form
    }

    /// The list element's id, `awesomplete_list_N`.
    pub fn list_id(&self) -> String {
        format!("awesomplete_list_{}", self.instance)
    }

    /// The active configuration.
    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    /// Raw items of the current candidate source.
    pub fn items(&self) -> &[RawItem] {
        &self.items
    }

    /// Suggestions from the last evaluation.
    pub fn suggestions(&self) -> &[Candidate] {
        &self.suggestions
    }

    /// Whether the list is visible.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Index of the highlighted suggestion.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.index
    }

    /// The highlighted suggestion.
    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.index.and_then(|i| self.suggestions.get(i))
    }

    // =========================================================================
    // Candidate source
    // =========================================================================

    /// Replace the candidate source.
    ///
    /// A source that cannot be resolved keeps the current items. Re-evaluates
    /// when the input has focus.
    pub fn set_list(&mut self, doc: &mut Document, source: impl Into<CandidateSource>) -> Result<()> {
        if let Some(items) = source.into().resolve(doc) {
            self.items = items;
        }
        if doc.active_element() == Some(self.input) {
            self.evaluate(doc)?;
        }
        Ok(())
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Recompute suggestions for the input's current value and re-render the
    /// list, opening or closing it as needed.
    pub fn evaluate(&mut self, doc: &mut Document) -> Result<()> {
        let _span = PerfSpan::new(span_names::EVALUATE);
        let value = doc.value(self.input).to_string();

        if value.chars().count() < self.config.min_chars || self.items.is_empty() {
            tracing::trace!(target: targets::AUTOCOMPLETE, instance = self.instance, "input below threshold");
            self.close(doc, CloseReason::NoMatches)?;
            doc.set_text_content(self.status, "No results found")?;
            return Ok(());
        }

        self.index = None;
        doc.clear_children(self.list)?;

        let query = Query::new(&value);
        let mut suggestions: Vec<Candidate> = self
            .items
            .iter()
            .filter_map(|item| Candidate::from_raw(&(self.config.data)(item, &value)))
            .filter(|candidate| (self.config.filter)(candidate, &query))
            .collect();
        if let Some(sort) = &self.config.sort {
            suggestions.sort_by(|a, b| sort(a, b));
        }
        suggestions.truncate(self.config.max_items);

        let list_id = self.list_id();
        for (index, candidate) in suggestions.iter().enumerate() {
            let id = format!("{list_id}_item_{index}");
            let item = RenderItem {
                candidate,
                query: &query,
                index,
                id: &id,
            };
            let li = (self.config.item)(doc, &item)?;
            doc.append_child(self.list, li)?;
        }
        self.suggestions = suggestions;

        tracing::trace!(
            target: targets::AUTOCOMPLETE,
            instance = self.instance,
            input = %value,
            matches = self.suggestions.len(),
            "evaluated"
        );

        if self.suggestions.is_empty() {
            doc.set_text_content(self.status, "No results found")?;
            self.close(doc, CloseReason::NoMatches)?;
        } else {
            self.open(doc)?;
            let count = self.suggestions.len();
            doc.set_text_content(self.status, &format!("{count} results found"))?;
        }
        Ok(())
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    /// Show the list and status region.
    ///
    /// With auto-first, highlights the first item if nothing is highlighted.
    /// `opened` is emitted only when the list was closed.
    pub fn open(&mut self, doc: &mut Document) -> Result<()> {
        doc.remove_attribute(self.list, "hidden")?;
        doc.remove_attribute(self.status, "hidden")?;
        let was_open = std::mem::replace(&mut self.is_open, true);

        if self.config.auto_first && self.index.is_none() {
            self.goto(doc, Some(0))?;
        }

        if !was_open {
            tracing::debug!(target: targets::AUTOCOMPLETE, instance = self.instance, "opened");
            self.opened.emit(());
        }
        Ok(())
    }

    /// Hide the list and clear the highlight. Does nothing when closed.
    pub fn close(&mut self, doc: &mut Document, reason: CloseReason) -> Result<()> {
        if !self.is_open {
            return Ok(());
        }

        doc.set_attribute(self.list, "hidden", "")?;
        self.is_open = false;
        self.index = None;
        doc.set_attribute(self.status, "hidden", "")?;

        tracing::debug!(target: targets::AUTOCOMPLETE, instance = self.instance, %reason, "closed");
        self.closed.emit(reason);
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Highlight the next item, wrapping to the first.
    pub fn next(&mut self, doc: &mut Document) -> Result<()> {
        let count = self.suggestions.len();
        let target = match self.index {
            Some(i) if i + 1 < count => Some(i + 1),
            _ if count > 0 => Some(0),
            _ => None,
        };
        self.goto(doc, target)
    }

    /// Highlight the previous item, wrapping to the last.
    pub fn previous(&mut self, doc: &mut Document) -> Result<()> {
        let count = self.suggestions.len();
        let target = match self.index {
            Some(i) if i > 0 => Some(i - 1),
            _ if count > 0 => Some(count - 1),
            _ => None,
        };
        self.goto(doc, target)
    }

    /// Highlight the item at `target`, or clear the highlight with `None`.
    ///
    /// Updates `aria-selected` on the items, the status text and the input's
    /// `aria-activedescendant`, then emits `highlighted`. An index past the
    /// end clears the highlight.
    pub fn goto(&mut self, doc: &mut Document, target: Option<usize>) -> Result<()> {
        let items = doc.element_children(self.list)?;

        if let Some(&previous) = self.index.and_then(|i| items.get(i)) {
            doc.set_attribute(previous, "aria-selected", "false")?;
        }

        let Some(i) = target else {
            self.index = None;
            return Ok(());
        };
        let Some(&li) = items.get(i) else {
            tracing::warn!(
                target: targets::AUTOCOMPLETE,
                instance = self.instance,
                index = i,
                count = items.len(),
                "highlight index out of range"
            );
            self.index = None;
            return Ok(());
        };

        self.index = Some(i);
        doc.set_attribute(li, "aria-selected", "true")?;
        let announcement = format!(
            "{}, list item {} of {}",
            doc.text_content(li)?,
            i + 1,
            items.len()
        );
        doc.set_text_content(self.status, &announcement)?;
        let item_id = format!("{}_item_{}", self.list_id(), i);
        doc.set_attribute(self.input, "aria-activedescendant", &item_id)?;

        if let Some(candidate) = self.suggestions.get(i) {
            self.highlighted.emit(candidate.clone());
        }
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Commit the highlighted item.
    ///
    /// Returns `true` when a suggestion was committed, `false` when nothing
    /// is highlighted or a `selecting` slot vetoed.
    pub fn select(&mut self, doc: &mut Document) -> Result<bool> {
        let Some(index) = self.index else {
            return Ok(false);
        };
        let Some(&li) = doc.element_children(self.list)?.get(index) else {
            return Ok(false);
        };
        self.commit(doc, index, li)
    }

    /// Commit a specific list item. `origin` is the element the user acted
    /// on, defaulting to the item itself.
    pub fn select_item(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        origin: Option<NodeId>,
    ) -> Result<bool> {
        if doc.parent(item)? != Some(self.list) {
            return Ok(false);
        }
        let index = doc.sibling_index(item)?;
        self.commit(doc, index, origin.unwrap_or(item))
    }

    fn commit(&mut self, doc: &mut Document, index: usize, origin: NodeId) -> Result<bool> {
        let Some(candidate) = self.suggestions.get(index).cloned() else {
            return Ok(false);
        };

        let allowed = self.selecting.emit_cancelable(SelectEvent {
            candidate: candidate.clone(),
            origin,
        });
        if !allowed {
            tracing::debug!(target: targets::AUTOCOMPLETE, instance = self.instance, label = %candidate.label, "selection vetoed");
            return Ok(false);
        }

        self.index = Some(index);
        (self.config.replace)(doc, self.input, &candidate)?;
        self.close(doc, CloseReason::Select)?;

        tracing::debug!(target: targets::AUTOCOMPLETE, instance = self.instance, value = %candidate.value, "selected");
        self.selected.emit(candidate);
        Ok(true)
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    /// Handle an `input` event on the input.
    pub fn handle_input(&mut self, doc: &mut Document) -> Result<()> {
        self.evaluate(doc)
    }

    /// Handle a `keydown` event on the input.
    ///
    /// Acts only while open. Returns `true` when the host should suppress the
    /// key's default action.
    pub fn handle_keydown(&mut self, doc: &mut Document, key: Key) -> Result<bool> {
        if !self.is_open {
            return Ok(false);
        }

        match key {
            Key::Enter if self.index.is_some() => {
                self.select(doc)?;
                Ok(true)
            }
            Key::Escape => {
                self.close(doc, CloseReason::Esc)?;
                Ok(false)
            }
            Key::ArrowUp => {
                self.previous(doc)?;
                Ok(true)
            }
            Key::ArrowDown => {
                self.next(doc)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Handle a `blur` event on the input.
    pub fn handle_blur(&mut self, doc: &mut Document) -> Result<()> {
        self.close(doc, CloseReason::Blur)
    }

    /// Handle a `submit` event on the enclosing form.
    pub fn handle_submit(&mut self, doc: &mut Document) -> Result<()> {
        self.close(doc, CloseReason::Submit)
    }

    /// Handle a `mousedown` event on the list.
    ///
    /// A left press on (or inside) a list item selects it. Returns `true`
    /// when the press targeted an item with the left button, whether or not
    /// the selection was vetoed.
    pub fn handle_pointer_down(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        button: MouseButton,
    ) -> Result<bool> {
        let item_selector = format!("#{} > li", self.list_id());
        let Some(li) = doc.closest_matching(target, &item_selector)? else {
            return Ok(false);
        };
        if button != MouseButton::Left {
            return Ok(false);
        }
        self.select_item(doc, li, Some(target))?;
        Ok(true)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Detach the widget, restoring the input to where it was.
    ///
    /// Unbinds listeners, moves the input back in front of the container,
    /// removes the container with its list and status region, strips the
    /// attributes added on attach and deregisters the instance.
    ///
    /// If a document operation fails the instance stays registered.
    #[tracing::instrument(skip_all, fields(instance = self.instance), target = "plumage::autocomplete", level = "debug")]
    pub fn destroy(self, doc: &mut Document) -> Result<()> {
        let owner = ListenerOwner(self.instance);
        doc.unbind(self.input, owner)?;
        if let Some(form) = self.form.filter(|&form| doc.contains(form)) {
            doc.unbind(form, owner)?;
        }

        match doc.parent(self.container)? {
            Some(parent) => doc.insert_before(parent, self.input, Some(self.container))?,
            None => doc.detach(self.input)?,
        }
        doc.remove(self.container)?;

        for name in INPUT_ATTRIBUTES {
            doc.remove_attribute(self.input, name)?;
        }

        self.registry.unregister(self.instance);
        self.opened.disconnect_all();
        self.closed.disconnect_all();
        self.highlighted.disconnect_all();
        self.selecting.disconnect_all();
        self.selected.disconnect_all();

        tracing::debug!(target: targets::AUTOCOMPLETE, "destroyed");
        Ok(())
    }
}

fn set_role(doc: &mut Document, node: NodeId, role: AccessibleRole) -> Result<()> {
    if let Some(aria) = role.aria_role() {
        doc.set_attribute(node, "role", aria)?;
    }
    Ok(())
}

impl fmt::Debug for Autocomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocomplete")
            .field("instance", &self.instance)
            .field("input", &self.input)
            .field("is_open", &self.is_open)
            .field("index", &self.index)
            .field("suggestions", &self.suggestions.len())
            .field("config", &self.config)
            .finish()
    }
}
