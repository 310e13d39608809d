//! Core systems for Plumage.
//!
//! This crate provides the foundational pieces the Plumage widgets build on:
//!
//! - **Document Model**: An arena-backed element tree with attributes, text,
//!   form values, focus and listener bookkeeping
//! - **Selectors**: CSS selector parsing and matching for element lookup
//! - **Signal/Slot System**: Type-safe notifications, including cancelable
//!   signals that let any slot veto an action
//! - **Logging**: Tracing targets and document tree visualization
//!
//! # Signal Example
//!
//! ```
//! use plumage_core::Signal;
//!
//! let value_changed = Signal::<String>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit("Barn Owl".to_string());
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Document Example
//!
//! ```
//! use plumage_core::Document;
//!
//! let mut doc = Document::new();
//! let input = doc.create_element("input");
//! doc.add_class(input, "awesomplete").unwrap();
//! doc.append_child(doc.root(), input).unwrap();
//!
//! assert_eq!(doc.query_selector("input.awesomplete").unwrap(), Some(input));
//! ```

pub mod dom;
mod error;
pub mod logging;
pub mod selector;
pub mod signal;

pub use dom::{Document, EventKind, ListenerOwner, NodeId, NodeKind};
pub use error::{CoreError, DomError, DomResult, Result};
pub use logging::{DocumentTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use selector::{parse_selector, Selector, SelectorError};
pub use signal::{Cancelable, ConnectionId, Signal};
