//! Error types for Plumage core systems.

use std::fmt;

use crate::selector::SelectorError;

/// The main error type for Plumage core operations.
#[derive(Debug)]
pub enum CoreError {
    /// Document-related error.
    Dom(DomError),
    /// Selector parsing error.
    Selector(SelectorError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(err) => write!(f, "Document error: {err}"),
            Self::Selector(err) => write!(f, "Selector error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            Self::Selector(err) => Some(err),
        }
    }
}

impl From<DomError> for CoreError {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

impl From<SelectorError> for CoreError {
    fn from(err: SelectorError) -> Self {
        Self::Selector(err)
    }
}

/// Errors that can occur during document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node ID is invalid or has been removed.
    InvalidNode,
    /// Attempted to insert a node inside itself or one of its descendants.
    CircularParentage,
    /// The node has no parent, but the operation needs one.
    Detached,
    /// The reference node is not a child of the given parent.
    NotAChild,
    /// The operation requires an element, but the node is a text node.
    NotAnElement,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode => write!(f, "Invalid or removed node ID"),
            Self::CircularParentage => {
                write!(f, "Cannot insert a node into itself or one of its descendants")
            }
            Self::Detached => write!(f, "Node is not attached to a parent"),
            Self::NotAChild => write!(f, "Reference node is not a child of the parent"),
            Self::NotAnElement => write!(f, "Node is a text node, not an element"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result type for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;

/// A specialized Result type for Plumage core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
