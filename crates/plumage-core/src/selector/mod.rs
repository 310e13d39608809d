//! CSS selectors for locating elements in a [`Document`](crate::dom::Document).
//!
//! Supports type (`li`), universal (`*`), id (`#species`), class (`.awesomplete`)
//! and attribute presence (`[disabled]`) selectors, combined with the
//! descendant (whitespace) and child (`>`) combinators.

mod matcher;
mod parser;
mod types;

pub use matcher::{ElementMatchContext, SelectorMatcher};
pub use parser::parse_selector;
pub use types::{Combinator, Selector, SelectorPart, TypeSelector};

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector contained nothing to match.
    #[error("Empty selector")]
    Empty,

    /// The selector could not be parsed.
    #[error("Invalid selector '{selector}': {message}")]
    Invalid { selector: String, message: String },
}

impl SelectorError {
    /// Create an invalid-selector error.
    pub fn invalid(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}
