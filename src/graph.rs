//! The graph store: nodes, directed weighted edges, and the adjacency
//! bookkeeping between them.
//!
//! Nodes and edges are owned exclusively by the [`GraphStore`]; everything
//! else — edge endpoints, adjacency lists, predecessor links — refers to
//! them by id, never by pointer, so references stay meaningful across graph
//! mutation.  Ids are process-unique, monotonically increasing, and never
//! reused.  Positional indices, by contrast, renumber when earlier nodes are
//! removed; id lookup and positional lookup are distinct operations.
//!
//! Every edge appears in exactly two adjacency lists: its source's outgoing
//! list and its target's incoming list, under the same id.  Removal detaches
//! both entries atomically.  Self-loops and parallel edges are permitted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::error::GraphError;
use crate::traversal::{TraversalState, VisitColor};

// Ids are drawn from process-wide counters, not per-store ones, so an id
// from one store can never collide with an id from another and the
// belongs-to-this-store checks stay meaningful across stores.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_EDGE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifier of a node.  Unique within the process and stable for the
/// node's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// Identifier of an edge.  Unique within the process and stable for the
/// edge's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u64);

/// A directed, weighted arc between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    id: EdgeId,
    from: NodeId,
    to: NodeId,
    length: f64,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    /// The edge weight.  May be negative; algorithms that cannot tolerate
    /// negative weights say so at their own entry points.
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// A node: a user value plus adjacency lists and transient traversal state.
#[derive(Clone, Debug)]
pub struct Node<T> {
    id: NodeId,
    value: T,
    edges_out: Vec<EdgeId>,
    edges_in: Vec<EdgeId>,
    pub(crate) state: TraversalState,
}

impl<T> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Outgoing edge ids, in insertion order.
    pub fn edges_out(&self) -> &[EdgeId] {
        &self.edges_out
    }

    /// Incoming edge ids, in insertion order.
    pub fn edges_in(&self) -> &[EdgeId] {
        &self.edges_in
    }

    /// Discovery color written by the most recent BFS/DFS run.
    pub fn color(&self) -> VisitColor {
        self.state.color
    }

    /// Tentative distance written by the most recent traversal run.
    /// `f64::INFINITY` when the node was not reached.
    pub fn distance(&self) -> f64 {
        self.state.distance
    }

    /// The node this one was discovered or last relaxed from, if any.
    pub fn predecessor(&self) -> Option<NodeId> {
        self.state.predecessor
    }
}

/// An in-memory directed weighted graph.
///
/// Nodes are kept in insertion order; `node_at` and `find_index` speak in
/// positional indices over that order, while `node` and the id types speak
/// in stable identities.  Mutating the graph while a traversal is mid-run is
/// a caller-contract violation and produces undefined traversal results.
#[derive(Debug, Default)]
pub struct GraphStore<T> {
    nodes: Vec<Node<T>>,
    positions: HashMap<NodeId, usize>,
    edges: HashMap<EdgeId, Edge>,
    traversed: bool,
}

impl<T> GraphStore<T> {
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::new(),
            positions: HashMap::new(),
            edges: HashMap::new(),
            traversed: false,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether a traversal has run since the last state clear.  When set,
    /// per-node traversal fields hold that run's results; the next algorithm
    /// call clears them implicitly.
    pub fn is_traversed(&self) -> bool {
        self.traversed
    }

    pub(crate) fn set_traversed(&mut self, traversed: bool) {
        self.traversed = traversed;
    }

    /// Clears stale traversal state if a previous run left any behind.
    pub(crate) fn ensure_cleared(&mut self) {
        if self.traversed {
            self.clear_traversal_state();
        }
    }

    /// Resets every node's traversal fields to their defaults and clears the
    /// traversed flag.
    pub fn clear_traversal_state(&mut self) {
        for node in &mut self.nodes {
            node.state.reset();
        }
        self.traversed = false;
    }

    /// Appends a node holding `value` and returns its id.  O(1).
    pub fn add_node(&mut self, value: T) -> NodeId {
        let id = NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed));
        self.positions.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            value,
            edges_out: Vec::new(),
            edges_in: Vec::new(),
            state: TraversalState::default(),
        });
        trace!(?id, "added node");
        id
    }

    /// Creates a directed edge `from -> to` of the given length and registers
    /// it on both adjacency lists.  O(1).  The weight sign is not validated.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, length: f64) -> Result<EdgeId, GraphError> {
        let from_pos = self.position(from)?;
        let to_pos = self.position(to)?;
        let id = EdgeId(NEXT_EDGE_ID.fetch_add(1, Ordering::Relaxed));
        self.edges.insert(id, Edge { id, from, to, length });
        self.nodes[from_pos].edges_out.push(id);
        self.nodes[to_pos].edges_in.push(id);
        trace!(?id, ?from, ?to, length, "added edge");
        Ok(id)
    }

    /// Index-pair form of [`add_edge`](Self::add_edge).
    pub fn add_edge_between(
        &mut self,
        from_index: usize,
        to_index: usize,
        length: f64,
    ) -> Result<EdgeId, GraphError> {
        let from = self.node_at(from_index)?.id;
        let to = self.node_at(to_index)?.id;
        self.add_edge(from, to, length)
    }

    fn position(&self, id: NodeId) -> Result<usize, GraphError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Gets a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let pos = *self.positions.get(&id)?;
        Some(&mut self.nodes[pos])
    }

    /// Gets a node by positional index in store order.
    pub fn node_at(&self, index: usize) -> Result<&Node<T>, GraphError> {
        self.nodes.get(index).ok_or(GraphError::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    /// The current positional index of a node, if it belongs to this store.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Iterates nodes in store order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// Iterates node ids in store order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    /// Gets an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Iterates all edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Positional index of the first node whose value matches, scanning in
    /// store order.
    pub fn find_index(&self, predicate: impl Fn(&T) -> bool) -> Option<usize> {
        self.nodes.iter().position(|node| predicate(&node.value))
    }

    /// First node whose value matches, scanning in store order.
    pub fn find_node(&self, predicate: impl Fn(&T) -> bool) -> Option<&Node<T>> {
        self.nodes.iter().find(|node| predicate(&node.value))
    }

    /// Removes a node by id, detaching every edge that touches it in either
    /// direction first.  Returns the node's value.
    pub fn remove_node(&mut self, id: NodeId) -> Result<T, GraphError> {
        let index = self.position(id)?;
        self.remove_node_at(index)
    }

    /// Removes a node by positional index.  Surviving nodes keep their ids
    /// but their positional indices renumber.
    pub fn remove_node_at(&mut self, index: usize) -> Result<T, GraphError> {
        if index >= self.nodes.len() {
            return Err(GraphError::IndexOutOfRange {
                index,
                len: self.nodes.len(),
            });
        }
        let id = self.nodes[index].id;
        let mut touching = self.nodes[index].edges_out.clone();
        for &eid in &self.nodes[index].edges_in {
            // A self-loop is in both lists; detach it once.
            if !touching.contains(&eid) {
                touching.push(eid);
            }
        }
        for eid in touching {
            self.remove_edge(eid)?;
        }
        let node = self.nodes.remove(index);
        self.positions.remove(&id);
        for (pos, survivor) in self.nodes.iter().enumerate().skip(index) {
            self.positions.insert(survivor.id, pos);
        }
        trace!(?id, "removed node");
        Ok(node.value)
    }

    /// Removes the first node whose value matches the predicate.  Returns
    /// whether a removal occurred.
    pub fn remove_node_where(&mut self, predicate: impl Fn(&T) -> bool) -> bool {
        match self.find_index(predicate) {
            Some(index) => {
                self.remove_node_at(index)
                    .expect("index from find_index is in bounds");
                true
            }
            None => false,
        }
    }

    /// Removes an edge, detaching it from both endpoints' adjacency lists.
    ///
    /// # Panics
    ///
    /// Panics if the edge exists in the edge table but is missing from
    /// either adjacency list.  That state means the mirror invariant between
    /// outgoing and incoming lists is broken, which cannot be reached
    /// through this API.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let edge = self.edges.remove(&id).ok_or(GraphError::UnknownEdge(id))?;
        let from_pos = self
            .position(edge.from)
            .expect("edge source must belong to this store");
        let out_slot = self.nodes[from_pos]
            .edges_out
            .iter()
            .position(|&eid| eid == id)
            .unwrap_or_else(|| panic!("edge {id:?} missing from source adjacency list"));
        self.nodes[from_pos].edges_out.remove(out_slot);
        let to_pos = self
            .position(edge.to)
            .expect("edge target must belong to this store");
        let in_slot = self.nodes[to_pos]
            .edges_in
            .iter()
            .position(|&eid| eid == id)
            .unwrap_or_else(|| panic!("edge {id:?} missing from target adjacency list"));
        self.nodes[to_pos].edges_in.remove(in_slot);
        trace!(?id, "removed edge");
        Ok(edge)
    }

    /// Builds a graph from a square adjacency matrix and a parallel list of
    /// node values.  A nonzero cell at row `r`, column `c` creates an edge
    /// from node `r` to node `c` whose length is the cell value.
    pub fn from_matrix(values: Vec<T>, matrix: &[Vec<f64>]) -> Result<Self, GraphError> {
        let dim = matrix.len();
        for (row, cells) in matrix.iter().enumerate() {
            if cells.len() != dim {
                return Err(GraphError::NonSquareMatrix {
                    rows: dim,
                    row,
                    cols: cells.len(),
                });
            }
        }
        if values.len() != dim {
            return Err(GraphError::SizeMismatch {
                values: values.len(),
                expected: dim,
            });
        }
        let mut store = GraphStore::new();
        let ids: Vec<NodeId> = values.into_iter().map(|value| store.add_node(value)).collect();
        for (row, cells) in matrix.iter().enumerate() {
            for (col, &weight) in cells.iter().enumerate() {
                if weight != 0.0 {
                    store.add_edge(ids[row], ids[col], weight)?;
                }
            }
        }
        Ok(store)
    }

    /// Builds a graph from node values and explicit
    /// `(from_index, to_index, weight)` triples.
    pub fn from_edge_list(
        values: Vec<T>,
        triples: &[(usize, usize, f64)],
    ) -> Result<Self, GraphError> {
        if values.is_empty() && !triples.is_empty() {
            return Err(GraphError::SizeMismatch {
                values: 0,
                expected: 1,
            });
        }
        let mut store = GraphStore::new();
        let ids: Vec<NodeId> = values.into_iter().map(|value| store.add_node(value)).collect();
        for &(from, to, weight) in triples {
            let len = ids.len();
            let resolve = |index: usize| {
                ids.get(index)
                    .copied()
                    .ok_or(GraphError::IndexOutOfRange { index, len })
            };
            store.add_edge(resolve(from)?, resolve(to)?, weight)?;
        }
        Ok(store)
    }
}
