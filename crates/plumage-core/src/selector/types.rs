//! Parsed selector representation.

use std::fmt;

/// A parsed selector such as `form > datalist#species option[disabled]`.
///
/// `parts[i]` and `parts[i + 1]` are joined by `combinators[i]`, so there is
/// always one fewer combinator than parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
    pub combinators: Vec<Combinator>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.parts.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for (combinator, part) in self.combinators.iter().zip(parts) {
            let joiner = match combinator {
                Combinator::Descendant => " ",
                Combinator::Child => " > ",
            };
            write!(f, "{joiner}{part}")?;
        }
        Ok(())
    }
}

/// The tests applied to a single element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    pub type_selector: Option<TypeSelector>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Attribute names that must be present.
    pub attributes: Vec<String>,
}

impl SelectorPart {
    /// A part matching one tag name.
    pub fn type_only(tag: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Type(tag.into())),
            ..Self::default()
        }
    }

    /// A part matching one class.
    pub fn class_only(class_name: impl Into<String>) -> Self {
        Self {
            classes: vec![class_name.into()],
            ..Self::default()
        }
    }

    /// A part matching an id.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.classes.push(class_name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// True when the part tests nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_selector {
            Some(TypeSelector::Universal) => f.write_str("*")?,
            Some(TypeSelector::Type(tag)) => f.write_str(tag)?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for attribute in &self.attributes {
            write!(f, "[{attribute}]")?;
        }
        Ok(())
    }
}

/// Tag test of a selector part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// `*`
    Universal,
    Type(String),
}

/// How two adjacent parts relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: the direct parent.
    Child,
}
