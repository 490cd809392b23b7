//! Error types for graph and heap operations.
//!
//! Every failure surfaces synchronously at the call that caused it; nothing
//! is retried internally. Violations of the store's internal adjacency
//! invariant are not represented here at all — they panic, because they can
//! only arise from a bug inside this crate.

use crate::graph::{EdgeId, NodeId};

/// Errors raised by [`GraphStore`](crate::GraphStore) operations and the
/// traversal algorithms.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A node id that does not belong to this store was passed in.
    #[error("node {0:?} does not belong to this graph")]
    UnknownNode(NodeId),
    /// An edge id that does not belong to this store was passed in.
    #[error("edge {0:?} does not belong to this graph")]
    UnknownEdge(EdgeId),
    /// A positional index was outside the store's current bounds.
    #[error("index {index} is out of range for a graph of {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },
    /// An adjacency matrix had a row whose width differs from the row count.
    #[error("adjacency matrix is not square: {rows} rows but row {row} has {cols} columns")]
    NonSquareMatrix { rows: usize, row: usize, cols: usize },
    /// The supplied node values do not match the matrix dimension, or edges
    /// were supplied without any node values.
    #[error("node value count {values} does not match expected {expected}")]
    SizeMismatch { values: usize, expected: usize },
    /// The operation requires at least one node.
    #[error("graph is empty")]
    EmptyGraph,
    /// The operation requires exactly one connectivity component.
    #[error("graph has {0} connectivity components, expected exactly one")]
    Disconnected(usize),
    /// Bellman-Ford found a negative-weight cycle; shortest paths from the
    /// requested start are ill-defined.
    #[error("negative-weight cycle detected")]
    NegativeCycle,
}

/// Errors raised by [`IndexedHeap`](crate::IndexedHeap).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// `pop` was called on an empty heap.
    #[error("cannot pop from an empty heap")]
    Empty,
}
