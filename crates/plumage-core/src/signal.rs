//! Signal/observer system for Plumage.
//!
//! Widgets publish each lifecycle transition as a typed [`Signal`]. Connected
//! slots (callbacks) are invoked synchronously, on the emitting thread, in the
//! order they were connected.
//!
//! A slot is any `Fn(&Args) + Send + Sync` closure; [`Signal::connect`]
//! hands back a [`ConnectionId`] for removing it again. Notifications that
//! announce an action others may refuse carry a [`Cancelable<T>`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use plumage_core::Signal;
//!
//! let sightings = Signal::<String>::new();
//! let count = Arc::new(AtomicUsize::new(0));
//!
//! let counter = count.clone();
//! let id = sightings.connect(move |_species| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! sightings.emit("Kestrel".to_string());
//! sightings.disconnect(id);
//! sightings.emit("Merlin".to_string());
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Vetoing
//!
//! ```
//! use plumage_core::{Cancelable, Signal};
//!
//! let about_to_select = Signal::<Cancelable<String>>::new();
//! about_to_select.connect(|event| {
//!     if event.payload() == "forbidden" {
//!         event.cancel();
//!     }
//! });
//!
//! assert!(about_to_select.emit_cancelable("allowed".to_string()));
//! assert!(!about_to_select.emit_cancelable("forbidden".to_string()));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Handle for one connected slot, accepted by [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connection storage. `order` keeps registration order, which slotmap
/// iteration does not guarantee once keys are reused.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

/// A typed notification with any number of connected slots.
///
/// Emitting passes a reference to the arguments to every slot. Slots may connect or disconnect other slots
/// while being invoked; such changes take effect from the next emission.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// An unconnected signal.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
            blocked: AtomicBool::new(false),
        }
    }

    /// Add a slot. It runs after every slot connected before it.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Remove one slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_some() {
            connections.order.retain(|&existing| existing != id);
            true
        } else {
            false
        }
    }

    /// Remove every slot.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Suppress emission until unblocked.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in registration order.
    #[tracing::instrument(skip_all, target = "plumage_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "blocked");
            return;
        }

        // Snapshot the slots so the lock is not held while user code runs.
        let slots: Vec<Slot<Args>> = {
            let connections = self.connections.lock();
            connections
                .order
                .iter()
                .filter_map(|id| connections.slots.get(*id).cloned())
                .collect()
        };
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<T: 'static> Signal<Cancelable<T>> {
    /// Emit a cancelable notification.
    ///
    /// Every slot sees the payload, even after an earlier slot has canceled.
    /// Returns `true` when no slot called [`Cancelable::cancel`]. A blocked
    /// signal reaches no slots and therefore always allows the action.
    pub fn emit_cancelable(&self, payload: T) -> bool {
        let event = Cancelable::new(payload);
        let canceled = event.canceled.clone();
        self.emit(event);
        !canceled.load(Ordering::SeqCst)
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connections.lock().slots.len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

/// A notification payload that observers may veto.
///
/// Emitted through [`Signal::emit_cancelable`]. Calling [`cancel`](Self::cancel)
/// from any slot makes the emitter abort the action it announced.
#[derive(Debug)]
pub struct Cancelable<T> {
    payload: T,
    canceled: Arc<AtomicBool>,
}

impl<T> Cancelable<T> {
    fn new(payload: T) -> Self {
        Self {
            payload,
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The announced payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Veto the announced action.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    /// Whether any slot has vetoed so far.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

impl<T> std::ops::Deref for Cancelable<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(signal: &Signal<String>) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        signal.connect(move |name: &String| sink.lock().push(name.clone()));
        log
    }

    #[test]
    fn test_emit_reaches_slot() {
        let signal = Signal::new();
        let log = recorder(&signal);

        signal.emit("Dunlin".to_string());
        signal.emit("Knot".to_string());

        assert_eq!(*log.lock(), vec!["Dunlin", "Knot"]);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = Signal::<String>::new();
        let log = Arc::new(Mutex::new(0));
        let sink = log.clone();
        let id = signal.connect(move |_| *sink.lock() += 1);

        signal.emit("Dunlin".to_string());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit("Knot".to_string());

        assert_eq!(*log.lock(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_blocked_signal_is_silent() {
        let signal = Signal::new();
        let log = recorder(&signal);

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        signal.emit("Dunlin".to_string());
        signal.set_blocked(false);
        signal.emit("Knot".to_string());

        assert_eq!(*log.lock(), vec!["Knot"]);
    }

    #[test]
    fn test_slots_run_in_registration_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for tag in ["a", "b", "c"] {
            let order_clone = order.clone();
            ids.push(signal.connect(move |_| order_clone.lock().push(tag)));
        }

        // Free a slot, then connect again; the new slot must still run last.
        signal.disconnect(ids[0]);
        let order_clone = order.clone();
        signal.connect(move |_| order_clone.lock().push("d"));

        signal.emit(());
        assert_eq!(*order.lock(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::new();
        let log = recorder(&signal);
        recorder(&signal);
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        signal.emit("Dunlin".to_string());
        assert_eq!(signal.connection_count(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_slot_may_connect_during_emit() {
        let signal = Arc::new(Signal::<i32>::new());
        let hits = Arc::new(Mutex::new(0));

        let signal_clone = signal.clone();
        let hits_clone = hits.clone();
        signal.connect(move |_| {
            let hits_inner = hits_clone.clone();
            signal_clone.connect(move |_| *hits_inner.lock() += 1);
        });

        signal.emit(1);
        assert_eq!(*hits.lock(), 0);
        signal.emit(2);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_cancelable_without_slots_is_allowed() {
        let signal = Signal::<Cancelable<&'static str>>::new();
        assert!(signal.emit_cancelable("anything"));
    }

    #[test]
    fn test_cancelable_veto_reaches_every_slot() {
        let signal = Signal::<Cancelable<i32>>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        signal.connect(|event| event.cancel());
        let seen_clone = seen.clone();
        signal.connect(move |event| {
            seen_clone.lock().push((**event, event.is_canceled()));
        });

        assert!(!signal.emit_cancelable(7));
        assert_eq!(*seen.lock(), vec![(7, true)]);
    }
}
