//! Accessibility roles of the autocomplete parts.
//!
//! The widget writes ARIA `role` attributes into the document. With the
//! `accessibility` feature, the same roles convert to AccessKit roles for
//! hosts that expose an accessibility tree natively.

use plumage_core::{Document, NodeId};

/// The accessibility role of an autocomplete part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessibleRole {
    /// The text input that owns the suggestion list.
    ComboBox,
    /// The suggestion list.
    ListBox,
    /// One suggestion.
    ListBoxOption,
    /// The live region announcing result counts and the highlighted item.
    Status,
    /// The wrapper around input, list and status.
    Container,
}

impl AccessibleRole {
    /// The ARIA `role` attribute value. The container has none.
    pub fn aria_role(self) -> Option<&'static str> {
        match self {
            Self::ComboBox => Some("combobox"),
            Self::ListBox => Some("listbox"),
            Self::ListBoxOption => Some("option"),
            Self::Status => Some("status"),
            Self::Container => None,
        }
    }

    /// Parse an ARIA `role` attribute value.
    pub fn from_aria(role: &str) -> Option<Self> {
        match role {
            "combobox" => Some(Self::ComboBox),
            "listbox" => Some(Self::ListBox),
            "option" => Some(Self::ListBoxOption),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Read the role of an element from its `role` attribute.
    ///
    /// `div.awesomplete` wrappers report [`AccessibleRole::Container`].
    pub fn of(doc: &Document, node: NodeId) -> Option<Self> {
        match doc.attribute(node, "role") {
            Some(role) => Self::from_aria(role),
            None if doc.has_class(node, "awesomplete") && doc.tag_name(node).ok() == Some("div") => {
                Some(Self::Container)
            }
            None => None,
        }
    }

    /// Convert to AccessKit's Role enum.
    #[cfg(feature = "accessibility")]
    pub fn to_accesskit_role(self) -> accesskit::Role {
        use accesskit::Role;

        match self {
            Self::ComboBox => Role::ComboBox,
            Self::ListBox => Role::ListBox,
            Self::ListBoxOption => Role::ListBoxOption,
            Self::Status => Role::Status,
            Self::Container => Role::GenericContainer,
        }
    }
}

#[cfg(feature = "accessibility")]
impl From<AccessibleRole> for accesskit::Role {
    fn from(role: AccessibleRole) -> Self {
        role.to_accesskit_role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aria_round_trip() {
        for role in [
            AccessibleRole::ComboBox,
            AccessibleRole::ListBox,
            AccessibleRole::ListBoxOption,
            AccessibleRole::Status,
        ] {
            let aria = role.aria_role().unwrap();
            assert_eq!(AccessibleRole::from_aria(aria), Some(role));
        }
        assert_eq!(AccessibleRole::Container.aria_role(), None);
        assert_eq!(AccessibleRole::from_aria("button"), None);
    }

    #[test]
    fn test_role_of_element() {
        let mut doc = Document::new();
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, "awesomplete").unwrap();
        let list = doc.create_element("ul");
        doc.set_attribute(list, "role", "listbox").unwrap();
        let plain = doc.create_element("span");

        assert_eq!(AccessibleRole::of(&doc, wrapper), Some(AccessibleRole::Container));
        assert_eq!(AccessibleRole::of(&doc, list), Some(AccessibleRole::ListBox));
        assert_eq!(AccessibleRole::of(&doc, plain), None);
    }

    #[cfg(feature = "accessibility")]
    #[test]
    fn test_accesskit_roles() {
        assert_eq!(
            accesskit::Role::from(AccessibleRole::ComboBox),
            accesskit::Role::ComboBox
        );
        assert_eq!(
            AccessibleRole::Status.to_accesskit_role(),
            accesskit::Role::Status
        );
    }
}
