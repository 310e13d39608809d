//! Logging and debugging facilities for Plumage.
//!
//! Target constants for filtering `tracing` output, a text dump of document
//! trees, and a span guard for timing hot paths.
//!
//! # Tracing Integration
//!
//! Plumage uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```
//! tracing_subscriber::fmt()
//!     .with_env_filter("plumage::autocomplete=debug")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Use [`DocumentTreeDebug`] to dump the element hierarchy:
//!
//! ```
//! use plumage_core::dom::Document;
//! use plumage_core::logging::DocumentTreeDebug;
//!
//! let mut doc = Document::new();
//! let input = doc.create_element("input");
//! doc.append_child(doc.root(), input).unwrap();
//!
//! let output = DocumentTreeDebug::new().format_document(&doc).unwrap();
//! assert!(output.contains("<input>"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::dom::{Document, NodeId, NodeKind};
use crate::error::DomResult;

/// Span names used throughout Plumage for tracing.
pub mod span_names {
    /// Autocomplete list evaluation span.
    pub const EVALUATE: &str = "plumage::evaluate";
    /// Species lookup span.
    pub const LOOKUP: &str = "plumage::lookup";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "plumage_core";
    /// Document model target.
    pub const DOM: &str = "plumage_core::dom";
    /// Signal system target.
    pub const SIGNAL: &str = "plumage_core::signal";
    /// Autocomplete widget target.
    pub const AUTOCOMPLETE: &str = "plumage::autocomplete";
    /// Species lookup target.
    pub const SPECIES: &str = "plumage::species";
    /// Performance spans.
    pub const PERF: &str = "plumage::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `+--` and `` `-- `` branches.
    Ascii,
    /// Box-drawing branches.
    #[default]
    Unicode,
    /// Dashes only.
    Compact,
}

/// Configuration for document tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Append the slotmap key of each node.
    pub show_ids: bool,
    pub show_attributes: bool,
    /// Include text nodes, rendered as quoted strings.
    pub show_text: bool,
    /// Deepest level printed; the starting node is level 0.
    pub max_depth: Option<usize>,
    /// Spaces between branch columns.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_attributes: true,
            show_text: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including node ids.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            ..Default::default()
        }
    }

    /// Element tags only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_attributes: false,
            show_text: false,
            ..Default::default()
        }
    }
}

/// Renders a document, or part of one, as an indented tag tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentTreeDebug {
    options: TreeFormatOptions,
}

impl DocumentTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the whole document from its root.
    pub fn format_document(&self, doc: &Document) -> DomResult<String> {
        let mut output = String::new();
        let _ = writeln!(output, "Document ({} nodes):", doc.node_count());
        self.format_subtree_into(doc, doc.root(), 0, true, &mut output)?;
        Ok(output)
    }

    /// Format a subtree starting from a specific node.
    pub fn format_subtree(&self, doc: &Document, root: NodeId) -> DomResult<String> {
        let mut output = String::new();
        self.format_subtree_into(doc, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        doc: &Document,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> DomResult<()> {
        if let Some(max) = self.options.max_depth {
            if depth > max {
                return Ok(());
            }
        }

        match doc.kind(id)? {
            NodeKind::Text(text) => {
                if !self.options.show_text {
                    return Ok(());
                }
                output.push_str(&self.build_prefix(depth, is_last));
                let _ = write!(output, "{:?}", text);
            }
            NodeKind::Element(tag) => {
                output.push_str(&self.build_prefix(depth, is_last));
                output.push('<');
                output.push_str(tag);
                if self.options.show_attributes {
                    for (name, value) in doc.attributes(id)? {
                        if value.is_empty() {
                            let _ = write!(output, " {}", name);
                        } else {
                            let _ = write!(output, " {}=\"{}\"", name, value);
                        }
                    }
                }
                output.push('>');
            }
        }

        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }
        output.push('\n');

        let children: Vec<NodeId> = if self.options.show_text {
            doc.children(id)?.to_vec()
        } else {
            doc.element_children(id)?
        };
        let child_count = children.len();
        for (i, child_id) in children.into_iter().enumerate() {
            self.format_subtree_into(doc, child_id, depth + 1, i + 1 == child_count, output)?;
        }

        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "plumage::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// `tracing::trace!` with the core target.
#[macro_export]
macro_rules! plumage_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "plumage_core", $($arg)*)
    };
}

/// `tracing::debug!` with the core target.
#[macro_export]
macro_rules! plumage_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "plumage_core", $($arg)*)
    };
}

/// `tracing::warn!` with the core target.
#[macro_export]
macro_rules! plumage_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "plumage_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, "awesomplete").unwrap();
        doc.append_child(doc.root(), wrapper).unwrap();

        let input = doc.create_element("input");
        doc.set_attribute(input, "hidden", "").unwrap();
        doc.append_child(wrapper, input).unwrap();

        let list = doc.create_element("ul");
        doc.append_child(wrapper, list).unwrap();
        let li = doc.create_element("li");
        doc.set_text_content(li, "Barn Owl").unwrap();
        doc.append_child(list, li).unwrap();
        (doc, wrapper)
    }

    #[test]
    fn test_format_document() {
        let (doc, _) = sample();
        let output = DocumentTreeDebug::new().format_document(&doc).unwrap();

        assert!(output.starts_with("Document (6 nodes):"));
        assert!(output.contains("<body>"));
        assert!(output.contains("<div class=\"awesomplete\">"));
        assert!(output.contains("<input hidden>"));
        assert!(output.contains("\"Barn Owl\""));
    }

    #[test]
    fn test_format_minimal() {
        let (doc, wrapper) = sample();
        let debug = DocumentTreeDebug::with_options(TreeFormatOptions::minimal());
        let output = debug.format_subtree(&doc, wrapper).unwrap();

        assert_eq!(output.lines().next(), Some("<div>"));
        assert!(!output.contains("Barn Owl"));
        assert!(!output.contains("["));
    }

    #[test]
    fn test_format_ascii_depth() {
        let (doc, wrapper) = sample();
        let debug = DocumentTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        });
        let output = debug.format_subtree(&doc, wrapper).unwrap();

        assert_eq!(output, "<div>\n+-- <input>\n`-- <ul>\n");
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("plumage_core=trace,plumage::perf=trace")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_perf_span() {
        init_logging();
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_core_macros_under_subscriber() {
        init_logging();
        let (mut doc, wrapper) = sample();
        let input = doc.element_children(wrapper).unwrap()[0];

        doc.focus(input).unwrap();
        assert!(doc.remove(doc.root()).is_err());
        doc.remove(wrapper).unwrap();

        assert_eq!(doc.active_element(), None);
        assert_eq!(doc.node_count(), 1);
    }
}
