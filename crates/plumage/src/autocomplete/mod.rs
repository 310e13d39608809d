//! Accessible autocomplete for text inputs.
//!
//! [`Autocomplete`] attaches to an input element in a [`Document`](plumage_core::Document),
//! filters a candidate list as the user types, and renders the matches into
//! an ARIA listbox with keyboard and pointer selection.
//!
//! The pieces:
//!
//! - [`AutocompleteConfig`] / [`AutocompleteSettings`]: tunables and their
//!   serializable form
//! - [`Query`] with [`filter_contains`], [`filter_starts_with`] and
//!   [`sort_by_length`]: the default matching rules
//! - [`Registry`]: instance numbering and bulk attachment

mod config;
mod events;
mod matcher;
mod registry;
mod widget;

pub use config::{
    render_item, replace_value, AutocompleteConfig, AutocompleteSettings, DataFn, FilterFn,
    FilterKind, ItemFn, RenderItem, ReplaceFn, SortFn,
};
pub use events::{CloseReason, Key, MouseButton, SelectEvent};
pub use matcher::{filter_contains, filter_starts_with, sort_by_length, Query, Segment};
pub use registry::{Registry, DEFAULT_SELECTOR};
pub use widget::Autocomplete;
