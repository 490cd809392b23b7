//! An in-memory, weighted, directed graph store with traversal and
//! shortest-path algorithms, backed by an index-tracking binary-heap
//! priority queue.
//!
//! The [`GraphStore`] owns nodes and edges and keeps the adjacency lists of
//! both directions in sync; the algorithms ([`GraphStore::bfs`],
//! [`GraphStore::dfs`], [`GraphStore::dijkstra`], [`GraphStore::jarnik`],
//! [`GraphStore::bellman_ford`], cycle detection, component counting) write
//! their results into each node's transient traversal fields.  Dijkstra and
//! Jarnik drive an [`IndexedHeap`] whose position observer keeps each node's
//! cached heap slot current, making relaxation a logarithmic decrease-key.
//!
//! The whole crate assumes a single-threaded, synchronous caller with
//! exclusive access; no operation suspends or performs I/O.

pub mod algo;
pub mod error;
pub mod graph;
pub mod heap;
pub mod traversal;

pub use algo::{LightestEdge, MstEdge, Relaxation, ShortestPath};
pub use error::{GraphError, HeapError};
pub use graph::{Edge, EdgeId, GraphStore, Node, NodeId};
pub use heap::{IndexedHeap, ObserveFn, PositionObserver};
pub use traversal::{TraversalState, VisitColor};
