// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=perch_display --heading-base-level=0

//! Perch Display: a display tree whose nodes publish membership events.
//!
//! ## Overview
//!
//! Every [`DisplayNode`] composes an [`EventDispatcher`](perch_event::EventDispatcher)
//! and keeps the dispatcher's parent link in step with its own. Structural
//! changes are announced through that dispatcher:
//!
//! - `added` (bubbling) at a node after it is linked to a new parent.
//! - `removed` (bubbling) at a node before it is unlinked, so ancestors still hear it.
//! - `added-to-root` / `removed-from-root` (broadcast to the whole subtree)
//!   when a node becomes connected to, or disconnected from, a root.
//!
//! [`DisplayNode::broadcast`] delivers any non-bubbling event to a subtree.
//!
//! ## Semantics
//!
//! Parents own their children; child-to-parent links are weak. No tree borrow
//! is held while listeners run, so listeners may restructure the tree. Moving
//! a node under its current parent only reorders it and dispatches nothing.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use perch_display::DisplayNode;
//! use perch_event::EventType;
//!
//! let stage = DisplayNode::new_root();
//! let sprite = DisplayNode::named("sprite");
//!
//! let on_stage = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&on_stage);
//! sprite
//!     .dispatcher()
//!     .add_event_listener(EventType::ADDED_TO_ROOT, move |_| flag.set(true))
//!     .unwrap();
//!
//! stage.add_child(&sprite).unwrap();
//! assert!(on_stage.get());
//! assert_eq!(sprite.root(), Some(stage));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod node;

pub use error::TreeError;
pub use node::{DisplayNode, WeakDisplayNode};
