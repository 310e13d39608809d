//! Input events the widget reacts to and notifications it emits.

use std::fmt;

use plumage_core::NodeId;

use crate::candidate::Candidate;

/// Why the suggestion list closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The input lost focus.
    Blur,
    /// Escape was pressed.
    Esc,
    /// The enclosing form was submitted.
    Submit,
    /// An evaluation produced no suggestions.
    NoMatches,
    /// A suggestion was committed.
    Select,
}

impl CloseReason {
    /// The reason string carried by `awesomplete-close` events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Esc => "esc",
            Self::Submit => "submit",
            Self::NoMatches => "nomatches",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of the cancelable select notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEvent {
    /// The suggestion about to be committed.
    pub candidate: Candidate,
    /// The element the selection came from: the pointer target, or the
    /// highlighted list item for keyboard selection.
    pub origin: NodeId,
}

/// Keys the widget handles. Everything else is [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    /// Any other key, by DOM `keyCode`.
    Other(u16),
}

impl Key {
    /// Map a DOM `keyCode`.
    pub fn from_key_code(code: u16) -> Self {
        match code {
            13 => Self::Enter,
            27 => Self::Escape,
            38 => Self::ArrowUp,
            40 => Self::ArrowDown,
            other => Self::Other(other),
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_key_code(13), Key::Enter);
        assert_eq!(Key::from_key_code(40), Key::ArrowDown);
        assert_eq!(Key::from_key_code(65), Key::Other(65));
    }

    #[test]
    fn test_close_reason_names() {
        assert_eq!(CloseReason::NoMatches.to_string(), "nomatches");
        assert_eq!(CloseReason::Esc.as_str(), "esc");
    }
}
