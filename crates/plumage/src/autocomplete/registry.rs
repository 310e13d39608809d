//! Instance numbering and bookkeeping for attached widgets.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use plumage_core::logging::targets;
use plumage_core::Document;

use super::config::AutocompleteConfig;
use super::widget::Autocomplete;
use crate::error::Result;

/// Selector used by [`Registry::attach_all`].
pub const DEFAULT_SELECTOR: &str = "input.awesomplete";

struct RegistryState {
    /// Number of instances ever registered; the last number handed out.
    count: u64,
    live: BTreeSet<u64>,
}

/// Tracks live autocomplete instances and hands out instance numbers.
///
/// Instance numbers start at 1, increase monotonically and are never reused,
/// so element ids such as `awesomplete_list_3` stay unique per registry.
/// Cloning a `Registry` yields another handle to the same state.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Mutex<RegistryState>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryState {
                count: 0,
                live: BTreeSet::new(),
            })),
        }
    }

    /// Allocate the next instance number and mark it live.
    pub(crate) fn register(&self) -> u64 {
        let mut state = self.inner.lock();
        state.count += 1;
        let instance = state.count;
        state.live.insert(instance);
        instance
    }

    /// Mark an instance as no longer live.
    pub(crate) fn unregister(&self, instance: u64) -> bool {
        self.inner.lock().live.remove(&instance)
    }

    /// Whether an instance is live.
    pub fn contains(&self, instance: u64) -> bool {
        self.inner.lock().live.contains(&instance)
    }

    /// Live instance numbers, ascending.
    pub fn live_instances(&self) -> Vec<u64> {
        self.inner.lock().live.iter().copied().collect()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Whether no instance is live.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().live.is_empty()
    }

    /// Total number of instances ever registered.
    pub fn total_created(&self) -> u64 {
        self.inner.lock().count
    }

    /// Attach a widget to every `input.awesomplete` element in the document.
    pub fn attach_all(
        &self,
        doc: &mut Document,
        config: &AutocompleteConfig,
    ) -> Result<Vec<Autocomplete>> {
        self.attach_matching(doc, DEFAULT_SELECTOR, config)
    }

    /// Attach a widget to every element matching `selector`, in document order.
    pub fn attach_matching(
        &self,
        doc: &mut Document,
        selector: &str,
        config: &AutocompleteConfig,
    ) -> Result<Vec<Autocomplete>> {
        let inputs = doc.query_selector_all(selector)?;
        tracing::debug!(target: targets::AUTOCOMPLETE, selector, count = inputs.len(), "bulk attach");
        inputs
            .into_iter()
            .map(|input| Autocomplete::attach(doc, self, input, config.clone()))
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Registry")
            .field("count", &state.count)
            .field("live", &state.live)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_monotonic() {
        let registry = Registry::new();
        assert_eq!(registry.register(), 1);
        assert_eq!(registry.register(), 2);
        assert!(registry.unregister(1));
        assert_eq!(registry.register(), 3);

        assert_eq!(registry.live_instances(), vec![2, 3]);
        assert_eq!(registry.total_created(), 3);
        assert!(!registry.unregister(1));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = Registry::new();
        let handle = registry.clone();
        let instance = handle.register();

        assert!(registry.contains(instance));
        assert_eq!(registry.len(), 1);
        registry.unregister(instance);
        assert!(handle.is_empty());
    }

    #[test]
    fn test_attach_all_uses_default_selector() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        doc.append_child(doc.root(), form).unwrap();
        let mut inputs = Vec::new();
        for class in ["awesomplete", "plain", "awesomplete"] {
            let input = doc.create_element("input");
            doc.add_class(input, class).unwrap();
            doc.append_child(form, input).unwrap();
            inputs.push(input);
        }

        let registry = Registry::new();
        let widgets = registry
            .attach_all(&mut doc, &AutocompleteConfig::default())
            .unwrap();

        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].input(), inputs[0]);
        assert_eq!(widgets[1].input(), inputs[2]);
        assert_eq!(registry.live_instances(), vec![1, 2]);
    }
}
