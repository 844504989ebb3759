// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: the event type vocabulary, listener identities, and propagation flags.
//!
//! ## Overview
//!
//! Event types are plain strings matched by exact equality. The well-known
//! occurrences raised by the surrounding framework form the closed
//! [`KnownEvent`] enumeration; [`EventType`] is the open key that also admits
//! types defined by collaborators.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::string::String;
use core::borrow::Borrow;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::EventError;

/// Well-known occurrences raised by the display tree and its collaborators.
///
/// The event core places no meaning on these beyond routing; they exist so
/// producers and listeners agree on spelling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KnownEvent {
    /// A node was added to a parent.
    Added,
    /// A node became connected to a root, directly or through an ancestor.
    AddedToRoot,
    /// A node is being removed from its parent.
    Removed,
    /// A node is being disconnected from its root.
    RemovedFromRoot,
    /// An object asks the animation scheduler to drop it.
    RemovedFromScheduler,
    /// An animation or other timed operation completed.
    Completed,
    /// A control was triggered, e.g. a button was activated.
    Triggered,
    /// A subtree was flattened into a cached representation.
    Flatten,
    /// A render pass is about to draw the node.
    Render,
    /// An input press landed on the node.
    Press,
}

impl KnownEvent {
    /// Every well-known event, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Added,
        Self::AddedToRoot,
        Self::Removed,
        Self::RemovedFromRoot,
        Self::RemovedFromScheduler,
        Self::Completed,
        Self::Triggered,
        Self::Flatten,
        Self::Render,
        Self::Press,
    ];

    /// The string identifier used for routing.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::AddedToRoot => "added-to-root",
            Self::Removed => "removed",
            Self::RemovedFromRoot => "removed-from-root",
            Self::RemovedFromScheduler => "removed-from-scheduler",
            Self::Completed => "completed",
            Self::Triggered => "triggered",
            Self::Flatten => "flatten",
            Self::Render => "render",
            Self::Press => "press",
        }
    }

    /// Look up a well-known event by its exact string identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

/// Identifier of an event type.
///
/// A validated, non-empty string. Two types are the same type exactly when
/// their strings are equal, so `EventType::new("press")` and
/// [`EventType::PRESS`] are interchangeable.
///
/// ```
/// use perch_event::types::{EventType, KnownEvent};
///
/// let custom = EventType::new("score-changed").unwrap();
/// assert_eq!(custom.known(), None);
///
/// let press = EventType::new("press").unwrap();
/// assert_eq!(press, EventType::PRESS);
/// assert_eq!(press.known(), Some(KnownEvent::Press));
///
/// assert!(EventType::new("").is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// See [`KnownEvent::Added`].
    pub const ADDED: Self = Self::from_known(KnownEvent::Added);
    /// See [`KnownEvent::AddedToRoot`].
    pub const ADDED_TO_ROOT: Self = Self::from_known(KnownEvent::AddedToRoot);
    /// See [`KnownEvent::Removed`].
    pub const REMOVED: Self = Self::from_known(KnownEvent::Removed);
    /// See [`KnownEvent::RemovedFromRoot`].
    pub const REMOVED_FROM_ROOT: Self = Self::from_known(KnownEvent::RemovedFromRoot);
    /// See [`KnownEvent::RemovedFromScheduler`].
    pub const REMOVED_FROM_SCHEDULER: Self = Self::from_known(KnownEvent::RemovedFromScheduler);
    /// See [`KnownEvent::Completed`].
    pub const COMPLETED: Self = Self::from_known(KnownEvent::Completed);
    /// See [`KnownEvent::Triggered`].
    pub const TRIGGERED: Self = Self::from_known(KnownEvent::Triggered);
    /// See [`KnownEvent::Flatten`].
    pub const FLATTEN: Self = Self::from_known(KnownEvent::Flatten);
    /// See [`KnownEvent::Render`].
    pub const RENDER: Self = Self::from_known(KnownEvent::Render);
    /// See [`KnownEvent::Press`].
    pub const PRESS: Self = Self::from_known(KnownEvent::Press);

    /// Create an event type from its string identifier.
    ///
    /// Fails with [`EventError::InvalidArgument`] when `name` is empty.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Result<Self, EventError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EventError::InvalidArgument("event type must not be empty"));
        }
        Ok(Self(name))
    }

    /// The event type for a well-known occurrence.
    pub const fn from_known(known: KnownEvent) -> Self {
        Self(Cow::Borrowed(known.as_str()))
    }

    /// The string identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The well-known occurrence this type names, if any.
    pub fn known(&self) -> Option<KnownEvent> {
        KnownEvent::from_name(self.as_str())
    }
}

impl From<KnownEvent> for EventType {
    fn from(known: KnownEvent) -> Self {
        Self::from_known(known)
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// Hash and Eq of `EventType` are those of the inner string, so map lookups by `&str` agree.
impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into a validated [`EventType`].
///
/// Accepted wherever an event type is registered or an event is constructed,
/// so callers can pass a constant, a [`KnownEvent`], or a string.
pub trait IntoEventType {
    /// Validate and convert.
    fn into_event_type(self) -> Result<EventType, EventError>;
}

impl IntoEventType for EventType {
    fn into_event_type(self) -> Result<EventType, EventError> {
        Ok(self)
    }
}

impl IntoEventType for &EventType {
    fn into_event_type(self) -> Result<EventType, EventError> {
        Ok(self.clone())
    }
}

impl IntoEventType for KnownEvent {
    fn into_event_type(self) -> Result<EventType, EventError> {
        Ok(EventType::from_known(self))
    }
}

impl IntoEventType for &'static str {
    fn into_event_type(self) -> Result<EventType, EventError> {
        EventType::new(self)
    }
}

impl IntoEventType for String {
    fn into_event_type(self) -> Result<EventType, EventError> {
        EventType::new(self)
    }
}

/// The object on whose behalf a listener was attached.
///
/// Owners group listeners for bulk removal with
/// [`EventDispatcher::remove_owner_listeners`](crate::dispatcher::EventDispatcher::remove_owner_listeners).
/// An owner is only an identity: it never keeps the object alive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerOwner(usize);

/// Fresh identities are drawn from the upper half of the `usize` range.
const FRESH_OWNER_BASE: usize = 1 << (usize::BITS - 1);

static NEXT_OWNER: AtomicUsize = AtomicUsize::new(FRESH_OWNER_BASE);

impl ListenerOwner {
    /// Owner identity from a caller-chosen raw value.
    ///
    /// Values with the top bit set are reserved for [`ListenerOwner::fresh`];
    /// a raw owner in that range may match a fresh one.
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Owner identity of a reference-counted object (its allocation address).
    ///
    /// Stays stable while the object is alive; after it is dropped the address
    /// may be reused, so remove the object's listeners before dropping it.
    pub fn of<T: ?Sized>(owner: &Rc<T>) -> Self {
        Self(Rc::as_ptr(owner).cast::<()>() as usize)
    }

    /// A fresh owner identity, distinct from every other fresh identity.
    ///
    /// Fresh identities count up from the top half of the `usize` range, so
    /// they collide neither with small [`ListenerOwner::from_raw`] values nor,
    /// on 64-bit targets, with [`ListenerOwner::of`] identities, which are
    /// user-space heap addresses.
    pub fn fresh() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identity value.
    pub const fn raw(self) -> usize {
        self.0
    }
}

/// Identity of one listener registration.
///
/// A listener is registered at most once per `(event type, key)` pair; the key
/// is also what [`remove_listener`](crate::dispatcher::EventDispatcher::remove_listener)
/// matches on. `slot` tells apart several listeners attached by the same owner,
/// e.g. one per method.
///
/// ```
/// use std::rc::Rc;
/// use perch_event::types::{ListenerKey, ListenerOwner};
///
/// let button = Rc::new("button state");
/// let on_press = ListenerKey::new(ListenerOwner::of(&button), 0);
/// let on_release = ListenerKey::new(ListenerOwner::of(&button), 1);
/// assert_ne!(on_press, on_release);
/// assert_eq!(on_press.owner(), on_release.owner());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerKey {
    owner: ListenerOwner,
    slot: u32,
}

impl ListenerKey {
    /// Key for listener `slot` of `owner`.
    pub const fn new(owner: ListenerOwner, slot: u32) -> Self {
        Self { owner, slot }
    }

    /// A key distinct from every other unique key.
    pub fn unique() -> Self {
        Self::new(ListenerOwner::fresh(), 0)
    }

    /// The owner part of the key.
    pub const fn owner(self) -> ListenerOwner {
        self.owner
    }

    /// The slot part of the key.
    pub const fn slot(self) -> u32 {
        self.slot
    }
}

bitflags::bitflags! {
    /// Propagation-control flags of an [`Event`](crate::event::Event).
    ///
    /// Set only by listener code during dispatch and cleared when a new
    /// dispatch call begins.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Propagation: u8 {
        /// Do not visit further ancestors once the current node's listeners finish.
        const STOP           = 0b0000_0001;
        /// Do not invoke any further listener, at this node or any ancestor.
        const STOP_IMMEDIATE = 0b0000_0010;
    }
}
