// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by event construction and listener registration.

/// Failure reported synchronously by the call that violates its contract.
///
/// Dispatch itself never fails: dispatching without listeners, removing a
/// listener that was never registered, or bubbling from a node without a
/// parent are all no-ops.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EventError {
    /// An argument was rejected, for example an empty event type.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
