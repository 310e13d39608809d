//! Document model for Plumage.
//!
//! Provides an arena-backed element tree with:
//! - Stable node identifiers via slotmap storage
//! - Parent-child relationships with cascade removal
//! - Ordered attributes, text content and form values
//! - Selector queries, focus tracking and listener bookkeeping
//!
//! Widgets manipulate a [`Document`] the way browser widgets manipulate the
//! DOM: they wrap elements in containers, create list items, toggle
//! attributes, and record which events they listen to. Event dispatch itself
//! is left to the host, which calls the widget's handler methods.
//!
//! # Example
//!
//! ```
//! use plumage_core::dom::Document;
//!
//! let mut doc = Document::new();
//! let list = doc.create_element("ul");
//! doc.set_attribute(list, "id", "birds").unwrap();
//! doc.append_child(doc.root(), list).unwrap();
//!
//! let item = doc.create_element("li");
//! doc.set_text_content(item, "Barn Owl").unwrap();
//! doc.append_child(list, item).unwrap();
//!
//! assert_eq!(doc.element_by_id("birds"), Some(list));
//! assert_eq!(doc.text_content(list).unwrap(), "Barn Owl");
//! ```

use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::error::{DomError, DomResult};
use crate::logging::targets;
use crate::selector::{parse_selector, ElementMatchContext, Selector, SelectorError, SelectorMatcher};

new_key_type! {
    /// A unique identifier for a node in a [`Document`].
    ///
    /// `NodeId`s stay valid while nodes move around the tree and become
    /// invalid once the node is removed.
    pub struct NodeId;
}

/// Events a node can have listeners bound for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Text input changed.
    Input,
    /// A key was pressed.
    KeyDown,
    /// Focus left the element.
    Blur,
    /// A form was submitted.
    Submit,
    /// A pointer button was pressed.
    MouseDown,
}

impl EventKind {
    /// The DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::KeyDown => "keydown",
            Self::Blur => "blur",
            Self::Submit => "submit",
            Self::MouseDown => "mousedown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies who bound a listener, so it can be unbound later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerOwner(pub u64);

/// The kind of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a lowercase tag name.
    Element(String),
    /// A text node.
    Text(String),
}

/// Internal data stored for each node.
struct NodeData {
    kind: NodeKind,
    /// Attributes in insertion order.
    attributes: Vec<(String, String)>,
    /// The live `value` property of form controls.
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(ListenerOwner, EventKind)>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            value: None,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }
}

/// An element tree with a single root element.
///
/// Uses arena-based storage via SlotMap for stable node IDs.
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    active: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only a `body` root element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Element("body".to_string())));
        Self {
            nodes,
            root,
            active: None,
        }
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // Creation and removal
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self
            .nodes
            .insert(NodeData::new(NodeKind::Element(tag.to_ascii_lowercase())));
        tracing::trace!(target: targets::DOM, ?id, tag, "created element");
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.nodes.insert(NodeData::new(NodeKind::Text(text.to_string())))
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Remove a node and all its descendants.
    #[tracing::instrument(skip(self), target = "plumage_core::dom", level = "trace")]
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        if id == self.root {
            crate::plumage_warn!("refusing to remove the document root");
            return Err(DomError::Detached);
        }
        let descendants = self.descendants(id)?;
        self.detach(id)?;

        let removed = descendants.len() + 1;
        for node in descendants.into_iter().chain(std::iter::once(id)) {
            if self.active == Some(node) {
                self.active = None;
            }
            self.nodes.remove(node);
        }
        crate::plumage_debug!(?id, removed, "removed subtree");
        Ok(())
    }

    /// Detach a node from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_data) = self.nodes.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }
        if let Some(data) = self.nodes.get_mut(id) {
            data.parent = None;
        }
        Ok(())
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    #[tracing::instrument(skip(self), target = "plumage_core::dom", level = "trace")]
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or at the end if `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.node(parent)?.is_element() {
            return Err(DomError::NotAnElement);
        }
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CircularParentage);
        }
        if let Some(reference_id) = reference {
            if reference_id == child {
                return Ok(());
            }
            if self.node(reference_id)?.parent != Some(parent) {
                return Err(DomError::NotAChild);
            }
        }

        self.detach(child)?;

        let parent_data = self.node_mut(parent)?;
        let position = match reference {
            Some(reference_id) => parent_data
                .children
                .iter()
                .position(|&c| c == reference_id)
                .ok_or(DomError::NotAChild)?,
            None => parent_data.children.len(),
        };
        parent_data.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `container` where `target` is, then move `target` inside it.
    pub fn wrap(&mut self, target: NodeId, container: NodeId) -> DomResult<()> {
        let parent = self.parent(target)?.ok_or(DomError::Detached)?;
        self.insert_before(parent, container, Some(target))?;
        self.append_child(container, target)
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        self.node(id).map(|d| d.parent)
    }

    /// Get the children of a node, text nodes included.
    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        self.node(id).map(|d| d.children.as_slice())
    }

    /// Get the element children of a node.
    pub fn element_children(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        Ok(self
            .children(id)?
            .iter()
            .copied()
            .filter(|&child| self.nodes.get(child).is_some_and(NodeData::is_element))
            .collect())
    }

    /// Position of an element among its parent's element children.
    pub fn sibling_index(&self, id: NodeId) -> DomResult<usize> {
        let parent = self.parent(id)?.ok_or(DomError::Detached)?;
        self.element_children(parent)?
            .iter()
            .position(|&sibling| sibling == id)
            .ok_or(DomError::NotAnElement)
    }

    /// The nearest inclusive ancestor with the given tag.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let data = self.nodes.get(current_id)?;
            if let NodeKind::Element(name) = &data.kind {
                if name.eq_ignore_ascii_case(tag) {
                    return Some(current_id);
                }
            }
            current = data.parent;
        }
        None
    }

    /// The nearest inclusive ancestor matching a CSS selector.
    ///
    /// Fails with [`CoreError::Dom`](crate::CoreError::Dom) for a removed
    /// node and [`CoreError::Selector`](crate::CoreError::Selector) for an
    /// unparsable selector.
    pub fn closest_matching(&self, id: NodeId, selector: &str) -> crate::Result<Option<NodeId>> {
        self.node(id)?;
        let selector = parse_selector(selector)?;
        let mut current = Some(id);
        while let Some(current_id) = current {
            if self.matches(current_id, &selector) {
                return Ok(Some(current_id));
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        Ok(None)
    }

    /// Whether the node is in the tree under the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// All descendants in depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) -> DomResult<()> {
        let data = self.node(id)?;
        for &child_id in &data.children {
            result.push(child_id);
            self.collect_descendants(child_id, result)?;
        }
        Ok(())
    }

    // =========================================================================
    // Element data
    // =========================================================================

    /// The node kind.
    pub fn kind(&self, id: NodeId) -> DomResult<&NodeKind> {
        self.node(id).map(|d| &d.kind)
    }

    /// The tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> DomResult<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element(tag) => Ok(tag),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    /// Get an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|d| {
            d.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Check if an attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let data = self.element_mut(id)?;
        let name = name.to_ascii_lowercase();
        match data.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name, value.to_string())),
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let data = self.element_mut(id)?;
        let position = data.attributes.iter().position(|(key, _)| key == name);
        Ok(position.map(|p| data.attributes.remove(p).1))
    }

    /// All attributes in insertion order.
    pub fn attributes(&self, id: NodeId) -> DomResult<&[(String, String)]> {
        self.node(id).map(|d| d.attributes.as_slice())
    }

    /// Check if the `class` attribute contains a class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Add a class to the `class` attribute.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let classes = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &classes)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        let mut text = String::new();
        self.collect_text(id, &mut text)?;
        Ok(text)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        let data = self.node(id)?;
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &data.children {
                    self.collect_text(child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Replace all children with a single text node (or nothing for "").
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if let NodeKind::Text(existing) = &mut self.node_mut(id)?.kind {
            *existing = text.to_string();
            return Ok(());
        }
        self.clear_children(id)?;
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }

    /// Remove every child of a node.
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// The `value` property: the live value if one was set, else the
    /// `value` attribute, else "".
    pub fn value(&self, id: NodeId) -> &str {
        match self.nodes.get(id) {
            Some(data) => data
                .value
                .as_deref()
                .or_else(|| self.attribute(id, "value"))
                .unwrap_or(""),
            None => "",
        }
    }

    /// Set the live `value` property.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.element_mut(id)?.value = Some(value.to_string());
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Find the first connected element whose `id` attribute equals `element_id`.
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.connected_elements()
            .into_iter()
            .find(|&node| self.attribute(node, "id") == Some(element_id))
    }

    /// Find the first connected element matching a CSS selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .connected_elements()
            .into_iter()
            .find(|&node| self.matches(node, &selector)))
    }

    /// Find all connected elements matching a CSS selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .connected_elements()
            .into_iter()
            .filter(|&node| self.matches(node, &selector))
            .collect())
    }

    /// Check if an element matches a parsed selector.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let Some(context) = self.match_context(id) else {
            return false;
        };
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(id).and_then(|d| d.parent);
        while let Some(ancestor) = current {
            if let Some(ancestor_context) = self.match_context(ancestor) {
                ancestors.push(ancestor_context);
            }
            current = self.nodes.get(ancestor).and_then(|d| d.parent);
        }
        SelectorMatcher::matches(selector, &context, &ancestors)
    }

    fn match_context(&self, id: NodeId) -> Option<ElementMatchContext<'_>> {
        let data = self.nodes.get(id)?;
        let NodeKind::Element(tag) = &data.kind else {
            return None;
        };
        Some(ElementMatchContext {
            tag,
            id: self.attribute(id, "id"),
            classes: self
                .attribute(id, "class")
                .map(|c| c.split_whitespace().collect())
                .unwrap_or_default(),
            attributes: data.attributes.iter().map(|(key, _)| key.as_str()).collect(),
        })
    }

    /// Root followed by its element descendants, in document order.
    fn connected_elements(&self) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root).unwrap_or_default())
            .filter(|&node| self.nodes.get(node).is_some_and(NodeData::is_element))
            .collect()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Give an element focus.
    pub fn focus(&mut self, id: NodeId) -> DomResult<()> {
        self.element_mut(id)?;
        self.active = Some(id);
        crate::plumage_trace!(?id, "focused");
        Ok(())
    }

    /// Remove focus, returning the element that had it.
    pub fn blur(&mut self) -> Option<NodeId> {
        self.active.take()
    }

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    // =========================================================================
    // Listener bookkeeping
    // =========================================================================

    /// Record that `owner` listens for `events` on a node.
    pub fn bind(&mut self, id: NodeId, owner: ListenerOwner, events: &[EventKind]) -> DomResult<()> {
        let data = self.node_mut(id)?;
        for &event in events {
            if !data.listeners.contains(&(owner, event)) {
                data.listeners.push((owner, event));
            }
        }
        tracing::trace!(target: targets::DOM, ?id, ?owner, ?events, "bound listeners");
        Ok(())
    }

    /// Remove every listener `owner` bound on a node.
    pub fn unbind(&mut self, id: NodeId, owner: ListenerOwner) -> DomResult<()> {
        self.node_mut(id)?
            .listeners
            .retain(|(listener_owner, _)| *listener_owner != owner);
        Ok(())
    }

    /// Events bound on a node, by any owner.
    pub fn bound_events(&self, id: NodeId) -> Vec<EventKind> {
        self.nodes
            .get(id)
            .map(|d| d.listeners.iter().map(|(_, event)| *event).collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Internal access
    // =========================================================================

    fn node(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id).ok_or(DomError::InvalidNode)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::InvalidNode)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        let data = self.node_mut(id)?;
        if data.is_element() {
            Ok(data)
        } else {
            Err(DomError::NotAnElement)
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.nodes.len())
            .field("active", &self.active)
            .finish()
    }
}
