// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registries and the dispatch walk.
//!
//! ## Semantics
//!
//! [`EventDispatcher::dispatch`]:
//!
//! - Records the dispatcher as the event's target and current target, and
//!   clears the propagation flags.
//! - Snapshots the listeners registered at the current node for the event's
//!   type, then invokes them in registration order. Listeners may add or
//!   remove listeners anywhere while this happens; the snapshot is what runs.
//! - Checks [`Event::stops_immediate_propagation`] before every invocation.
//! - If the event bubbles, was not stopped, and the node has a
//!   [parent](EventDispatcher::parent), moves to the parent and repeats.
//!
//! The parent is resolved lazily, one step at a time, so the tree may change
//! shape while an event is in flight.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use perch_event::dispatcher::EventDispatcher;
//! use perch_event::event::Event;
//! use perch_event::types::EventType;
//!
//! let root = EventDispatcher::new();
//! let child = EventDispatcher::new();
//! child.set_parent(Some(&root));
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! for (name, node) in [("child", &child), ("root", &root)] {
//!     let seen = Rc::clone(&seen);
//!     node.add_event_listener(EventType::PRESS, move |_e: &mut Event| {
//!         seen.borrow_mut().push(name);
//!     })
//!     .unwrap();
//! }
//!
//! let mut press = Event::new(EventType::PRESS, true).unwrap();
//! child.dispatch(&mut press);
//! assert_eq!(*seen.borrow(), ["child", "root"]);
//! assert!(press.is_target(&child));
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::EventError;
use crate::event::Event;
use crate::types::{EventType, IntoEventType, ListenerKey, ListenerOwner};

/// Listener callable.
type Callback = dyn Fn(&mut Event);

/// Listener snapshot for one node; most nodes have only a few listeners per type.
type Snapshot = SmallVec<[Rc<Callback>; 4]>;

#[derive(Clone)]
struct Registration {
    key: ListenerKey,
    callback: Rc<Callback>,
}

#[derive(Default)]
struct DispatcherState {
    listeners: RefCell<HashMap<EventType, Vec<Registration>>>,
    parent: RefCell<WeakDispatcher>,
}

/// A node capable of publishing events and holding listener registrations.
///
/// This is a cheap handle: clones share one registry and compare equal.
/// Tree nodes compose a dispatcher and wire up its
/// [parent](Self::set_parent) as they are linked into a tree.
///
/// All calls for a dispatcher and its ancestors must happen on one thread;
/// the handle is neither `Send` nor `Sync`.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    state: Rc<DispatcherState>,
}

impl core::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let listeners = self.state.listeners.borrow();
        let registrations: usize = listeners.values().map(Vec::len).sum();
        f.debug_struct("EventDispatcher")
            .field("ptr", &Rc::as_ptr(&self.state))
            .field("event_types", &listeners.len())
            .field("registrations", &registrations)
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}

impl PartialEq for EventDispatcher {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EventDispatcher {}

impl EventDispatcher {
    /// Create a dispatcher with no listeners and no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether two handles refer to the same dispatcher.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// A non-owning handle to this dispatcher.
    pub fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher {
            state: Rc::downgrade(&self.state),
        }
    }

    /// The dispatcher events bubble to from here, if it is still alive.
    pub fn parent(&self) -> Option<Self> {
        self.state.parent.borrow().upgrade()
    }

    /// Set (or clear) the dispatcher events bubble to.
    ///
    /// The link is weak: the tree layer that calls this owns the nodes.
    pub fn set_parent(&self, parent: Option<&Self>) {
        *self.state.parent.borrow_mut() = parent.map_or_else(WeakDispatcher::new, Self::downgrade);
    }

    /// Register `callback` for `event_type` under `key`.
    ///
    /// New registrations are appended, so listeners run in registration order.
    /// Registering an already registered `(event_type, key)` pair is a no-op;
    /// the original callback stays in place.
    pub fn add_listener(
        &self,
        event_type: impl IntoEventType,
        key: ListenerKey,
        callback: impl Fn(&mut Event) + 'static,
    ) -> Result<(), EventError> {
        let event_type = event_type.into_event_type()?;
        let mut listeners = self.state.listeners.borrow_mut();
        let list = listeners.entry(event_type).or_default();
        if list.iter().any(|r| r.key == key) {
            return Ok(());
        }
        list.push(Registration {
            key,
            callback: Rc::new(callback),
        });
        Ok(())
    }

    /// Register `callback` under a fresh [`ListenerKey`] and return the key.
    pub fn add_event_listener(
        &self,
        event_type: impl IntoEventType,
        callback: impl Fn(&mut Event) + 'static,
    ) -> Result<ListenerKey, EventError> {
        let key = ListenerKey::unique();
        self.add_listener(event_type, key, callback)?;
        Ok(key)
    }

    /// Remove the registration of `key` for `event_type`.
    ///
    /// Returns whether a registration was removed; removing an absent
    /// listener is not an error.
    pub fn remove_listener(&self, event_type: impl AsRef<str>, key: ListenerKey) -> bool {
        self.remove_where(event_type.as_ref(), |r| r.key == key) > 0
    }

    /// Remove every registration of `owner` for `event_type`.
    ///
    /// Returns how many registrations were removed.
    pub fn remove_owner_listeners(&self, event_type: impl AsRef<str>, owner: ListenerOwner) -> usize {
        self.remove_where(event_type.as_ref(), |r| r.key.owner() == owner)
    }

    /// Remove every registration for `event_type`.
    pub fn remove_listeners_for(&self, event_type: impl AsRef<str>) {
        let event_type = event_type.as_ref();
        let removed = self.state.listeners.borrow_mut().remove(event_type);
        if removed.is_some() {
            tracing::debug!(event_type, "dropped listener list");
        }
    }

    /// Remove every registration for every event type.
    pub fn remove_all_listeners(&self) {
        let removed = core::mem::take(&mut *self.state.listeners.borrow_mut());
        tracing::debug!(event_types = removed.len(), "dropped all listener lists");
    }

    /// Whether at least one listener is registered here for `event_type`.
    ///
    /// Only this dispatcher is consulted, not its ancestors.
    pub fn has_listener(&self, event_type: impl AsRef<str>) -> bool {
        self.listener_count(event_type) > 0
    }

    /// Number of listeners registered here for `event_type`.
    pub fn listener_count(&self, event_type: impl AsRef<str>) -> usize {
        self.state
            .listeners
            .borrow()
            .get(event_type.as_ref())
            .map_or(0, Vec::len)
    }

    /// The event types that currently have listeners here, in no particular order.
    pub fn event_types(&self) -> Vec<EventType> {
        self.state.listeners.borrow().keys().cloned().collect()
    }

    /// Dispatch `event` here and, if it bubbles, up the chain of parents.
    ///
    /// See the [module docs](self) for the exact walk. A panic raised by a
    /// listener unwinds out of this call; no registry borrow is held while
    /// listeners run, so every registry stays consistent.
    pub fn dispatch(&self, event: &mut Event) {
        event.begin_dispatch(self);
        tracing::trace!(
            event_type = event.event_type().as_str(),
            bubbles = event.bubbles(),
            "dispatch"
        );
        let mut node = self.clone();
        loop {
            event.set_current_target(&node);
            node.invoke_listeners(event);
            if event.stops_propagation() {
                tracing::trace!(
                    event_type = event.event_type().as_str(),
                    immediate = event.stops_immediate_propagation(),
                    "propagation stopped"
                );
                break;
            }
            if !event.bubbles() {
                break;
            }
            let Some(parent) = node.parent() else {
                break;
            };
            node = parent;
        }
    }

    /// Construct an event and dispatch it here.
    ///
    /// A non-bubbling event with no local listener would reach nobody, so it
    /// is not constructed at all. The type is validated either way.
    pub fn dispatch_event_with(
        &self,
        event_type: impl IntoEventType,
        bubbles: bool,
        data: Option<Rc<dyn Any>>,
    ) -> Result<(), EventError> {
        let event_type = event_type.into_event_type()?;
        if !bubbles && !self.has_listener(&event_type) {
            return Ok(());
        }
        let mut event = Event::from_type(event_type, bubbles);
        if let Some(data) = data {
            event = event.with_shared_data(data);
        }
        self.dispatch(&mut event);
        Ok(())
    }

    fn invoke_listeners(&self, event: &mut Event) {
        let snapshot: Snapshot = {
            let listeners = self.state.listeners.borrow();
            match listeners.get(event.event_type().as_str()) {
                Some(list) => list.iter().map(|r| Rc::clone(&r.callback)).collect(),
                None => return,
            }
        };
        for callback in snapshot {
            if event.stops_immediate_propagation() {
                return;
            }
            callback(event);
        }
    }

    fn remove_where(&self, event_type: &str, mut pred: impl FnMut(&Registration) -> bool) -> usize {
        // Removed callbacks are dropped after the borrow ends; their captures may touch this registry.
        let removed: Vec<Registration> = {
            let mut listeners = self.state.listeners.borrow_mut();
            let Some(list) = listeners.get_mut(event_type) else {
                return 0;
            };
            let removed = list.extract_if(.., |r| pred(r)).collect();
            if list.is_empty() {
                listeners.remove(event_type);
                tracing::debug!(event_type, "dropped listener list");
            }
            removed
        };
        removed.len()
    }
}

/// Non-owning handle to an [`EventDispatcher`].
///
/// Held by events for their target and current target, and by dispatchers
/// for their parent. Never extends the dispatcher's lifetime.
#[derive(Clone, Debug, Default)]
pub struct WeakDispatcher {
    state: Weak<DispatcherState>,
}

impl WeakDispatcher {
    /// A handle that never upgrades.
    pub fn new() -> Self {
        Self { state: Weak::new() }
    }

    /// The dispatcher, if it is still alive.
    pub fn upgrade(&self) -> Option<EventDispatcher> {
        self.state.upgrade().map(|state| EventDispatcher { state })
    }

    /// Whether this handle refers to `dispatcher`.
    pub fn points_to(&self, dispatcher: &EventDispatcher) -> bool {
        Weak::ptr_eq(&self.state, &Rc::downgrade(&dispatcher.state))
    }
}
