// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations and broadcasts.

use perch_event::EventError;

/// Failure of a display tree operation.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// A child index was outside the valid range.
    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of children at the time of the call.
        len: usize,
    },
    /// A node cannot become a child of itself or of one of its descendants.
    #[error("a node cannot be added to itself or to one of its descendants")]
    CyclicInsert,
    /// The node is not a child of this container.
    #[error("node is not a child of this container")]
    NotAChild,
    /// Broadcasting is only defined for non-bubbling events.
    #[error("broadcast of bubbling events is prohibited")]
    BubblingBroadcast,
    /// Event construction failed.
    #[error(transparent)]
    Event(#[from] EventError),
}
