// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree nodes: structure, membership events, broadcasts.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use perch_event::{Event, EventDispatcher, EventType, IntoEventType};

use crate::error::TreeError;

/// A node of the display tree.
///
/// A cheap, reference-counted handle: clones refer to the same node and
/// compare equal. Parents own their children; the link back to the parent is
/// weak, as is the parent link of the node's [`EventDispatcher`].
///
/// Tree borrows are released before any event is dispatched, so listeners
/// may freely mutate the tree.
#[derive(Clone)]
pub struct DisplayNode {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    dispatcher: EventDispatcher,
    name: RefCell<Option<String>>,
    is_root: bool,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<DisplayNode>>,
}

impl core::fmt::Debug for DisplayNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DisplayNode")
            .field("name", &self.inner.name.borrow())
            .field("is_root", &self.inner.is_root)
            .field("children", &self.inner.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for DisplayNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DisplayNode {}

impl Default for DisplayNode {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayNode {
    fn with_parts(name: Option<String>, is_root: bool) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                dispatcher: EventDispatcher::new(),
                name: RefCell::new(name),
                is_root,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create a detached, unnamed node.
    pub fn new() -> Self {
        Self::with_parts(None, false)
    }

    /// Create a detached node with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_parts(Some(name.into()), false)
    }

    /// Create a root. Nodes connected to a root receive
    /// [`ADDED_TO_ROOT`](EventType::ADDED_TO_ROOT) and
    /// [`REMOVED_FROM_ROOT`](EventType::REMOVED_FROM_ROOT) broadcasts.
    pub fn new_root() -> Self {
        Self::with_parts(None, true)
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// A non-owning handle to this node, for listeners that refer back to it.
    pub fn downgrade(&self) -> WeakDisplayNode {
        WeakDisplayNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// The dispatcher this node publishes events through.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }

    /// The node's name, if it has one.
    pub fn name(&self) -> Option<String> {
        self.inner.name.borrow().clone()
    }

    /// Set or clear the node's name.
    pub fn set_name(&self, name: Option<String>) {
        *self.inner.name.borrow_mut() = name;
    }

    /// Whether this node was created with [`DisplayNode::new_root`].
    pub fn is_root(&self) -> bool {
        self.inner.is_root
    }

    /// The parent, if the node is attached and the parent is alive.
    pub fn parent(&self) -> Option<Self> {
        self.inner.parent.borrow().upgrade().map(|inner| Self { inner })
    }

    /// The topmost ancestor (the node itself if detached).
    pub fn base(&self) -> Self {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// The root this node is connected to, if any.
    pub fn root(&self) -> Option<Self> {
        let base = self.base();
        base.is_root().then_some(base)
    }

    /// Whether this node is connected to a root.
    pub fn is_on_root(&self) -> bool {
        self.base().is_root()
    }

    /// Number of direct children.
    pub fn num_children(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// The child at `index`, if any.
    pub fn child_at(&self, index: usize) -> Option<Self> {
        self.inner.children.borrow().get(index).cloned()
    }

    /// The first direct child named `name`.
    pub fn child_by_name(&self, name: &str) -> Option<Self> {
        self.inner
            .children
            .borrow()
            .iter()
            .find(|c| c.inner.name.borrow().as_deref() == Some(name))
            .cloned()
    }

    /// Position of `child` among the direct children.
    pub fn child_index(&self, child: &Self) -> Option<usize> {
        self.inner.children.borrow().iter().position(|c| c == child)
    }

    /// Snapshot of the direct children, in order.
    pub fn children(&self) -> Vec<Self> {
        self.inner.children.borrow().clone()
    }

    /// Whether `node` is this node or one of its descendants.
    pub fn contains(&self, node: &Self) -> bool {
        let mut cursor = Some(node.clone());
        while let Some(n) = cursor {
            if n == *self {
                return true;
            }
            cursor = n.parent();
        }
        false
    }

    /// Append `child`. See [`add_child_at`](Self::add_child_at).
    pub fn add_child(&self, child: &Self) -> Result<(), TreeError> {
        self.add_child_at(child, self.num_children())
    }

    /// Insert `child` at `index` (`0..=num_children`).
    ///
    /// - If `child` is already a child of this node, it is only moved.
    /// - Otherwise it is first removed from its current parent, then linked
    ///   here; a bubbling [`ADDED`](EventType::ADDED) is dispatched at the
    ///   child, and if this node is on a root,
    ///   [`ADDED_TO_ROOT`](EventType::ADDED_TO_ROOT) is broadcast to the child's subtree.
    /// - If a listener of that removal puts the child under another parent,
    ///   that placement is kept and nothing is added here.
    pub fn add_child_at(&self, child: &Self, index: usize) -> Result<(), TreeError> {
        let len = self.num_children();
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        if child.is_child_of(self) {
            return self.set_child_index(child, index.min(len - 1));
        }
        if child.contains(self) {
            return Err(TreeError::CyclicInsert);
        }

        child.remove_from_parent();
        // Removal listeners may have re-homed the child; their move stands.
        if child.parent().is_some() {
            tracing::debug!(child = ?child.name(), "child re-homed during removal, add skipped");
            return Ok(());
        }
        if child.contains(self) {
            return Err(TreeError::CyclicInsert);
        }
        {
            // Removal listeners may have changed our children.
            let mut children = self.inner.children.borrow_mut();
            let index = index.min(children.len());
            children.insert(index, child.clone());
        }
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        child.dispatcher().set_parent(Some(self.dispatcher()));
        tracing::debug!(parent = ?self.name(), child = ?child.name(), "added child");

        child.notify(EventType::ADDED, true);
        if self.is_on_root() {
            child.broadcast_type(EventType::ADDED_TO_ROOT);
        }
        Ok(())
    }

    /// Remove `child` if it is a direct child. Returns whether it was.
    pub fn remove_child(&self, child: &Self) -> bool {
        match self.child_index(child) {
            Some(index) => self.remove_child_at(index).is_ok(),
            None => false,
        }
    }

    /// Remove and return the child at `index`.
    ///
    /// A bubbling [`REMOVED`](EventType::REMOVED) is dispatched at the child
    /// while it is still linked, so ancestors observe it; if the child is on a
    /// root, [`REMOVED_FROM_ROOT`](EventType::REMOVED_FROM_ROOT) is broadcast
    /// to its subtree. Only then is the child unlinked.
    pub fn remove_child_at(&self, index: usize) -> Result<Self, TreeError> {
        let child = self.child_at(index).ok_or(TreeError::IndexOutOfRange {
            index,
            len: self.num_children(),
        })?;

        child.notify(EventType::REMOVED, true);
        if self.is_on_root() {
            child.broadcast_type(EventType::REMOVED_FROM_ROOT);
        }

        // Listeners may have moved the child already; then it is no longer ours to unlink.
        if child.is_child_of(self) {
            {
                let mut children = self.inner.children.borrow_mut();
                if let Some(pos) = children.iter().position(|c| *c == child) {
                    children.remove(pos);
                }
            }
            *child.inner.parent.borrow_mut() = Weak::new();
            child.dispatcher().set_parent(None);
            tracing::debug!(parent = ?self.name(), child = ?child.name(), "removed child");
        }
        Ok(child)
    }

    /// Detach this node from its parent, if it has one.
    pub fn remove_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Remove every current child, last to first.
    ///
    /// Children added by listeners while this runs are left in place; children
    /// that listeners already moved elsewhere are skipped.
    pub fn remove_all_children(&self) {
        for child in self.children().iter().rev() {
            self.remove_child(child);
        }
    }

    /// Move `child` to `index` (`0..num_children`). Dispatches nothing.
    pub fn set_child_index(&self, child: &Self, index: usize) -> Result<(), TreeError> {
        let mut children = self.inner.children.borrow_mut();
        let len = children.len();
        let old = children
            .iter()
            .position(|c| c == child)
            .ok_or(TreeError::NotAChild)?;
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        let moved = children.remove(old);
        children.insert(index, moved);
        Ok(())
    }

    /// Swap the children at `a` and `b`. Dispatches nothing.
    pub fn swap_children_at(&self, a: usize, b: usize) -> Result<(), TreeError> {
        let mut children = self.inner.children.borrow_mut();
        let len = children.len();
        for index in [a, b] {
            if index >= len {
                return Err(TreeError::IndexOutOfRange { index, len });
            }
        }
        children.swap(a, b);
        Ok(())
    }

    /// Dispatch a non-bubbling `event` to this node and every descendant that
    /// listens for its type, in depth-first pre-order.
    ///
    /// Recipients are collected before the first dispatch: nodes added by
    /// listeners are not reached, nodes removed by listeners still are. Each
    /// recipient gets its own dispatch, so a stop only affects the recipient
    /// whose listener requested it.
    pub fn broadcast(&self, event: &mut Event) -> Result<(), TreeError> {
        if event.bubbles() {
            return Err(TreeError::BubblingBroadcast);
        }
        self.deliver(event);
        Ok(())
    }

    /// Construct a non-bubbling event and [`broadcast`](Self::broadcast) it.
    pub fn broadcast_event_with(
        &self,
        event_type: impl IntoEventType,
        data: Option<Rc<dyn Any>>,
    ) -> Result<(), TreeError> {
        let mut event = Event::from_parts(event_type, false, data)?;
        self.broadcast(&mut event)
    }

    fn is_child_of(&self, parent: &Self) -> bool {
        self.parent().is_some_and(|p| p == *parent)
    }

    fn collect_listeners(&self, event_type: &EventType, out: &mut Vec<Self>) {
        if self.dispatcher().has_listener(event_type) {
            out.push(self.clone());
        }
        for child in self.inner.children.borrow().iter() {
            child.collect_listeners(event_type, out);
        }
    }

    /// Dispatch a payload-free event at this node, skipping it when it could reach nobody.
    fn notify(&self, event_type: EventType, bubbles: bool) {
        if bubbles || self.dispatcher().has_listener(&event_type) {
            self.dispatcher()
                .dispatch(&mut Event::from_type(event_type, bubbles));
        }
    }

    fn broadcast_type(&self, event_type: EventType) {
        self.deliver(&mut Event::from_type(event_type, false));
    }

    fn deliver(&self, event: &mut Event) {
        let mut recipients = Vec::new();
        self.collect_listeners(event.event_type(), &mut recipients);
        tracing::trace!(
            event_type = event.event_type().as_str(),
            recipients = recipients.len(),
            "broadcast"
        );
        for node in recipients {
            node.dispatcher().dispatch(event);
        }
    }
}

/// Weak counterpart of [`DisplayNode`].
#[derive(Clone, Debug, Default)]
pub struct WeakDisplayNode {
    inner: Weak<NodeInner>,
}

impl WeakDisplayNode {
    /// The node, if it is still alive.
    pub fn upgrade(&self) -> Option<DisplayNode> {
        self.inner.upgrade().map(|inner| DisplayNode { inner })
    }
}
