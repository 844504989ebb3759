// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Event`] value passed to listeners.
//!
//! An event describes one occurrence: its [type](crate::types::EventType),
//! whether it bubbles, and an optional payload. During dispatch it also
//! records where it came from ([`Event::target`]), where it currently is
//! ([`Event::current_target`]), and whether a listener asked to stop it.
//!
//! ## Payloads
//!
//! Payloads are type-erased and shared: listeners that know the meaning of an
//! event type downcast with [`Event::data_as`].
//!
//! ```
//! use perch_event::event::Event;
//! use perch_event::types::EventType;
//!
//! #[derive(Debug, PartialEq)]
//! struct Score(u32);
//!
//! let event = Event::new("score-changed", false).unwrap().with_data(Score(12));
//! assert_eq!(event.data_as::<Score>(), Some(&Score(12)));
//! assert_eq!(event.data_as::<u32>(), None);
//! assert!(event.target().is_none());
//! ```

use alloc::rc::Rc;
use core::any::Any;

use crate::dispatcher::{EventDispatcher, WeakDispatcher};
use crate::error::EventError;
use crate::types::{EventType, IntoEventType, Propagation};

/// One occurrence dispatched through an [`EventDispatcher`].
///
/// Type, bubbling and payload are fixed at construction. The back-references
/// to [`target`](Self::target) and [`current_target`](Self::current_target)
/// are weak, so an event never keeps the tree alive.
#[derive(Clone)]
pub struct Event {
    event_type: EventType,
    bubbles: bool,
    data: Option<Rc<dyn Any>>,
    target: WeakDispatcher,
    current_target: WeakDispatcher,
    propagation: Propagation,
}

impl core::fmt::Debug for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("has_data", &self.data.is_some())
            .field("propagation", &self.propagation)
            .finish_non_exhaustive()
    }
}

impl Event {
    /// Create an event without a payload.
    ///
    /// Fails with [`EventError::InvalidArgument`] if the type is empty.
    pub fn new(event_type: impl IntoEventType, bubbles: bool) -> Result<Self, EventError> {
        Self::from_parts(event_type, bubbles, None)
    }

    /// Create an event from all of its parts.
    ///
    /// `data` is shared with the caller, not copied.
    pub fn from_parts(
        event_type: impl IntoEventType,
        bubbles: bool,
        data: Option<Rc<dyn Any>>,
    ) -> Result<Self, EventError> {
        let event = Self::from_type(event_type.into_event_type()?, bubbles);
        Ok(match data {
            Some(data) => event.with_shared_data(data),
            None => event,
        })
    }

    /// Create an event from an already validated type; cannot fail.
    pub fn from_type(event_type: EventType, bubbles: bool) -> Self {
        Self {
            event_type,
            bubbles,
            data: None,
            target: WeakDispatcher::new(),
            current_target: WeakDispatcher::new(),
            propagation: Propagation::empty(),
        }
    }

    /// Attach an owned payload.
    #[must_use]
    pub fn with_data<T: Any>(self, data: T) -> Self {
        self.with_shared_data(Rc::new(data))
    }

    /// Attach a payload that the caller keeps a handle to.
    #[must_use]
    pub fn with_shared_data(mut self, data: Rc<dyn Any>) -> Self {
        self.data = Some(data);
        self
    }

    /// The event type.
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Whether the event bubbles to ancestors after its origin.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// The shared payload, if any.
    pub fn data(&self) -> Option<&Rc<dyn Any>> {
        self.data.as_ref()
    }

    /// The payload, if there is one and it is a `T`.
    pub fn data_as<T: Any>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref::<T>()
    }

    /// The dispatcher that initiated the current (or last) dispatch.
    ///
    /// `None` before the first dispatch, or once that dispatcher is gone.
    pub fn target(&self) -> Option<EventDispatcher> {
        self.target.upgrade()
    }

    /// The dispatcher whose listeners are being invoked.
    pub fn current_target(&self) -> Option<EventDispatcher> {
        self.current_target.upgrade()
    }

    /// Whether `dispatcher` initiated the current dispatch.
    ///
    /// Cheaper than comparing [`target`](Self::target), which upgrades.
    pub fn is_target(&self, dispatcher: &EventDispatcher) -> bool {
        self.target.points_to(dispatcher)
    }

    /// Prevent ancestors from receiving the event.
    ///
    /// Listeners still pending at the current node run.
    pub fn stop_propagation(&mut self) {
        self.propagation |= Propagation::STOP;
    }

    /// Prevent every further listener from receiving the event, at the
    /// current node and at all ancestors.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation |= Propagation::STOP | Propagation::STOP_IMMEDIATE;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) (or the immediate
    /// variant) was called during the current dispatch.
    pub fn stops_propagation(&self) -> bool {
        self.propagation.contains(Propagation::STOP)
    }

    /// Whether [`stop_immediate_propagation`](Self::stop_immediate_propagation)
    /// was called during the current dispatch.
    pub fn stops_immediate_propagation(&self) -> bool {
        self.propagation.contains(Propagation::STOP_IMMEDIATE)
    }

    /// Both propagation flags.
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// Reset per-dispatch state and record `origin` as target and current target.
    pub(crate) fn begin_dispatch(&mut self, origin: &EventDispatcher) {
        self.propagation = Propagation::empty();
        self.target = origin.downgrade();
        self.current_target = origin.downgrade();
    }

    pub(crate) fn set_current_target(&mut self, node: &EventDispatcher) {
        self.current_target = node.downgrade();
    }
}
