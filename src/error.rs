//! Error types for the tree engine and its façades.
//!
//! Recoverable conditions are ordinary values: a rejected duplicate comes back
//! as `false` from `insert` or as [`DuplicateKey`] from `try_insert`, and a
//! missing key is the end position. Misuse of a [`Position`] is a logic error
//! in the caller; the panicking API reports it with a [`UsageError`] message,
//! and the `try_*` API returns it.

use std::fmt;

use thiserror::Error;

use crate::tree::Position;

/// Returned by `try_insert` when a unique tree already holds an equal key.
///
/// The rejected data is handed back so the caller keeps ownership of it.
pub struct DuplicateKey<D> {
    /// Position of the record that already holds the key.
    pub existing: Position,
    /// The data that was not inserted.
    pub data: D,
}

impl<D> DuplicateKey<D> {
    /// Consumes the error, returning the rejected data.
    #[must_use]
    pub fn into_data(self) -> D {
        self.data
    }
}

impl<D> fmt::Debug for DuplicateKey<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DuplicateKey")
            .field("existing", &self.existing)
            .finish_non_exhaustive()
    }
}

impl<D> fmt::Display for DuplicateKey<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "key already present in unique tree")
    }
}

impl<D> std::error::Error for DuplicateKey<D> {}

/// Misuse of a [`Position`].
///
/// Every variant is a bug in the calling code. The panicking methods of
/// [`Tree`](crate::tree::Tree) panic with this error's message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    /// `next` was called on the end position.
    #[error("end of tree has no next position")]
    NextOfEnd,
    /// `prev` was called on the first position (or on the end of an empty tree).
    #[error("begin of tree has no previous position")]
    PrevOfBegin,
    /// The end position was passed to an erase operation.
    #[error("cannot erase the end position")]
    EraseEnd,
    /// The position names a record that has since been erased.
    #[error("position refers to an erased record")]
    StalePosition,
    /// The position was produced by a different tree.
    #[error("position does not belong to this tree")]
    ForeignPosition,
}

/// A broken structural invariant, as reported by
/// [`Tree::verify`](crate::tree::Tree::verify).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CorruptionError {
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,
    /// The root node has a parent link.
    #[error("root node has a parent")]
    RootHasParent,
    /// A red node has a red child.
    #[error("red node {parent} has red child {child}")]
    AdjacentRed {
        /// Arena index of the red parent.
        parent: usize,
        /// Arena index of the red child.
        child: usize,
    },
    /// Two paths below a node pass through different numbers of black nodes.
    #[error("unequal black height below node {node}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Arena index of the node.
        node: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A child does not link back to its parent.
    #[error("node {child} does not link back to parent {parent}")]
    ParentMismatch {
        /// Arena index of the parent.
        parent: usize,
        /// Arena index of the child.
        child: usize,
    },
    /// Two in-order neighbours are out of order (or equal in a unique tree).
    #[error("keys out of order at in-order rank {rank}")]
    OrderViolation {
        /// In-order rank of the second of the two records.
        rank: usize,
    },
    /// The stored length disagrees with the number of reachable nodes.
    #[error("length is {recorded} but {counted} nodes are reachable")]
    LengthMismatch {
        /// Length recorded by the tree.
        recorded: usize,
        /// Nodes found by traversal.
        counted: usize,
    },
    /// The cached minimum or maximum is not the real one.
    #[error("cached {which} bound is stale")]
    BoundsMismatch {
        /// `"leftmost"` or `"rightmost"`.
        which: &'static str,
    },
}

/// Invalid [`TreeConfig`](crate::config::TreeConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_span` is below the minimum span.
    #[error("max_span must be at least {minimum}, got {value}")]
    SpanTooSmall {
        /// The configured value.
        value: usize,
        /// The smallest accepted value.
        minimum: usize,
    },
    /// `max_span` is not a multiple of the span alignment.
    #[error("max_span must be a multiple of {alignment}, got {value}")]
    SpanNotAligned {
        /// The configured value.
        value: usize,
        /// The required alignment.
        alignment: usize,
    },
}
