// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.

use crate::diagnostics::Severity;
use crate::types::NodeId;

/// Failures that prevent establishing a consistent root state.
///
/// These abort the offending construction.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetupError {
    /// The platform already hosts a screen.
    #[error("a screen has already been opened on this platform")]
    ScreenAlreadyOpen,
    /// Priority outside `0.0..=1.0`.
    #[error("screen priority must lie in 0..=1, got {0}")]
    InvalidPriority(f64),
    /// Reference resolution with a non-positive component.
    #[error("reference resolution must be positive, got {0}")]
    InvalidReferenceResolution(arbor_geometry::Vector2),
    /// A node was placed under a parent that does not exist.
    #[error("cannot place a node under stale parent {0:?}")]
    StaleParent(NodeId),
    /// No scene is registered under this name.
    #[error("no scene named `{0}` is registered")]
    UnknownScene(String),
    /// The platform refused a request.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Errors raised by platform collaborators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Window or surface creation failed.
    #[error("window creation failed: {0}")]
    WindowCreation(String),
}

/// Recoverable structural or argument errors.
///
/// The operation that detects one of these is a no-op: it is reported through
/// [`crate::diagnostics`] and returned to the caller, and the tree keeps its
/// prior state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node id does not refer to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// The child is already a member of the parent.
    #[error("node {child:?} is already a child of {parent:?}")]
    DuplicateChild {
        /// Parent node.
        parent: NodeId,
        /// Child node.
        child: NodeId,
    },
    /// The child is not a member of the parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    MissingChild {
        /// Parent node.
        parent: NodeId,
        /// Child node.
        child: NodeId,
    },
    /// The requested parent is the node itself or one of its descendants.
    #[error("cannot parent {node:?} under its own descendant {parent:?}")]
    Cycle {
        /// Node being moved.
        node: NodeId,
        /// Requested parent.
        parent: NodeId,
    },
    /// A text operation was applied to a node that is not a text node.
    #[error("node {0:?} is not a text node")]
    NotText(NodeId),
}

impl TreeError {
    /// Severity used when the error is reported.
    pub fn severity(&self) -> Severity {
        match self {
            Self::StaleNode(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
