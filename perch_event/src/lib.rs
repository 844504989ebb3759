// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=perch_event --heading-base-level=0

//! Perch Event: the event-dispatch core of a retained-mode display tree.
//!
//! ## Overview
//!
//! Tree nodes publish typed occurrences (added to a parent, added to the root,
//! input press, frame completed, ...) and arbitrary listeners subscribe to
//! them. Events raised at a node may bubble up through its ancestors, DOM
//! style.
//!
//! - [`Event`](crate::event::Event): one occurrence. Type, bubbling flag and
//!   an optional type-erased payload are fixed at construction. During
//!   dispatch it carries weak references to its target and current target
//!   and the two propagation-control flags.
//! - [`EventDispatcher`](crate::dispatcher::EventDispatcher): a capability
//!   that tree nodes compose. It owns a per-type registry of listeners and
//!   walks the parent chain when an event bubbles.
//! - [`types`]: the [`EventType`](crate::types::EventType) vocabulary,
//!   listener identities, and [`Propagation`](crate::types::Propagation) flags.
//!
//! ## Dispatch
//!
//! A dispatch call is synchronous: every listener runs to completion, in
//! registration order, before the next one, and the whole ancestor walk
//! finishes before [`dispatch`](crate::dispatcher::EventDispatcher::dispatch)
//! returns.
//!
//! - `stop_propagation` lets the remaining listeners of the current node run
//!   but visits no further ancestors.
//! - `stop_immediate_propagation` invokes no further listener at all.
//! - Each node's listener list is snapshotted when the walk reaches it.
//!   Listeners may add and remove listeners (including themselves) on any
//!   node; a listener added to the node being walked first fires on the next
//!   dispatch.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use perch_event::dispatcher::EventDispatcher;
//! use perch_event::event::Event;
//! use perch_event::types::EventType;
//!
//! // A → B → C, with C the root.
//! let (a, b, c) = (EventDispatcher::new(), EventDispatcher::new(), EventDispatcher::new());
//! a.set_parent(Some(&b));
//! b.set_parent(Some(&c));
//!
//! let calls = Rc::new(RefCell::new(Vec::new()));
//! let l1 = Rc::clone(&calls);
//! a.add_event_listener(EventType::PRESS, move |e| {
//!     l1.borrow_mut().push("L1");
//!     e.stop_propagation();
//! })
//! .unwrap();
//! let l2 = Rc::clone(&calls);
//! b.add_event_listener(EventType::PRESS, move |_| l2.borrow_mut().push("L2")).unwrap();
//!
//! a.dispatch(&mut Event::new(EventType::PRESS, true).unwrap());
//! assert_eq!(*calls.borrow(), ["L1"]);
//! ```
//!
//! ## Threading
//!
//! There is no internal locking. Dispatchers are `!Send`; all dispatch and
//! registry calls for a subtree happen on the thread that owns it.
//!
//! ## Logging
//!
//! Dispatch steps are reported through [`tracing`] at `trace` level and
//! registry teardown at `debug` level. No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod types;

pub use dispatcher::{EventDispatcher, WeakDispatcher};
pub use error::EventError;
pub use event::Event;
pub use types::{EventType, IntoEventType, KnownEvent, ListenerKey, ListenerOwner, Propagation};
