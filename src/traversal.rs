//! Per-node transient traversal state.
//!
//! Every algorithm run populates these fields and leaves them in place for
//! the caller to read afterwards. The state is only meaningful for one run
//! at a time; [`GraphStore::clear_traversal_state`] resets it, and every
//! algorithm clears stale state implicitly before starting.
//!
//! [`GraphStore::clear_traversal_state`]: crate::GraphStore::clear_traversal_state

use crate::graph::NodeId;

/// Discovery state of a node during breadth- or depth-first traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisitColor {
    /// Not yet discovered.
    #[default]
    Unvisited,
    /// Discovered but not yet fully processed.  Re-reaching a `Visiting`
    /// node during depth-first traversal witnesses a cycle.
    Visiting,
    /// Fully processed.
    Done,
}

/// Transient per-node fields written by one algorithm run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraversalState {
    /// Discovery color; used by BFS, DFS, and cycle detection.
    pub color: VisitColor,
    /// Tentative distance from the start node.  Edge count for BFS, walk
    /// depth for DFS, path length for Dijkstra and Bellman-Ford, connecting
    /// edge weight for Jarnik.
    pub distance: f64,
    /// The node this one was discovered or last relaxed from.
    pub predecessor: Option<NodeId>,
    /// Opaque slot caching the node's current position inside the priority
    /// heap during priority-based relaxation.  Only meaningful mid-run.
    pub heap_slot: usize,
}

impl Default for TraversalState {
    fn default() -> Self {
        TraversalState {
            color: VisitColor::Unvisited,
            distance: f64::INFINITY,
            predecessor: None,
            heap_slot: 0,
        }
    }
}

impl TraversalState {
    /// Resets all fields to their pre-traversal defaults.
    pub fn reset(&mut self) {
        *self = TraversalState::default();
    }
}
