//! Traversal and shortest-path algorithms over a [`GraphStore`].
//!
//! All algorithms write their results into each node's transient traversal
//! fields (color, distance, predecessor) and leave them there for the caller
//! to read.  Stale state from a previous run is cleared implicitly before a
//! new run starts.  Mutating the graph while a run is in progress is a
//! caller-contract violation; results are undefined.
//!
//! Dijkstra and Jarnik share one priority-relaxation routine, parameterized
//! by a [`Relaxation`] strategy, driven by an [`IndexedHeap`] whose position
//! observer keeps each node's cached heap slot current so that a successful
//! relaxation becomes an O(log n) decrease-key instead of a linear search.

use std::cmp::Ordering;
use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::GraphError;
use crate::graph::{Edge, GraphStore, Node, NodeId};
use crate::heap::{IndexedHeap, PositionObserver};
use crate::traversal::VisitColor;

/// Heap-slot value marking a node that has left the priority queue.
const SETTLED: usize = usize::MAX;

/// Strategy deciding whether an edge improves its target's tentative
/// distance, and to what value.
pub trait Relaxation {
    /// Returns the improved distance for the edge's target, or `None` when
    /// the edge does not improve on `target_distance`.
    fn relax(&self, source_distance: f64, edge: &Edge, target_distance: f64) -> Option<f64>;
}

/// Cumulative path-length relaxation: the candidate is
/// `source_distance + edge.length()`.  Used by Dijkstra and Bellman-Ford.
pub struct ShortestPath;

impl Relaxation for ShortestPath {
    fn relax(&self, source_distance: f64, edge: &Edge, target_distance: f64) -> Option<f64> {
        let candidate = source_distance + edge.length();
        (candidate < target_distance).then_some(candidate)
    }
}

/// Raw edge-weight relaxation: the candidate is `edge.length()` alone,
/// ignoring how far the source is.  Used by Jarnik, where a node's recorded
/// distance is the weight of the lightest edge connecting it to the growing
/// tree.
pub struct LightestEdge;

impl Relaxation for LightestEdge {
    fn relax(&self, _source_distance: f64, edge: &Edge, target_distance: f64) -> Option<f64> {
        (edge.length() < target_distance).then_some(edge.length())
    }
}

/// One edge of a minimum spanning tree produced by
/// [`GraphStore::jarnik`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MstEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// The connecting edge's weight, as recorded in the target node's
    /// distance field at its last relaxation.
    pub weight: f64,
}

#[derive(Clone, Copy, Debug)]
struct HeapEntry {
    node: NodeId,
    distance: f64,
}

fn by_distance(a: &HeapEntry, b: &HeapEntry) -> Ordering {
    a.distance.total_cmp(&b.distance)
}

/// Observer that mirrors heap slot changes into each node's traversal state.
struct SlotWriter<'a, T>(&'a mut GraphStore<T>);

impl<T> PositionObserver<HeapEntry> for SlotWriter<'_, T> {
    fn position_changed(&mut self, entry: &HeapEntry, index: usize) {
        if let Some(node) = self.0.node_mut(entry.node) {
            node.state.heap_slot = index;
        }
    }
}

impl<T> GraphStore<T> {
    /// Breadth-first traversal from `start`.
    ///
    /// Produces a shortest-path tree by edge count on the reachable
    /// component: every reached node gets `distance` = number of edges from
    /// `start` and `predecessor` = the node that discovered it.
    pub fn bfs(&mut self, start: NodeId) -> Result<(), GraphError> {
        self.bfs_with(start, |_| {})
    }

    /// Like [`bfs`](Self::bfs), invoking `visit` once per node in
    /// visitation (dequeue) order.
    pub fn bfs_with(
        &mut self,
        start: NodeId,
        mut visit: impl FnMut(&Node<T>),
    ) -> Result<(), GraphError> {
        self.node(start).ok_or(GraphError::UnknownNode(start))?;
        self.ensure_cleared();
        debug!(?start, "bfs");
        self.bfs_from(start, &mut visit);
        self.set_traversed(true);
        Ok(())
    }

    fn bfs_from(&mut self, start: NodeId, visit: &mut impl FnMut(&Node<T>)) {
        let root = self.node_mut(start).expect("start node belongs to this store");
        root.state.color = VisitColor::Visiting;
        root.state.distance = 0.0;
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            self.node_mut(id).expect("queued node exists").state.color = VisitColor::Done;
            visit(self.node(id).expect("queued node exists"));
            let parent_distance = self.node(id).expect("queued node exists").distance();
            let out = self.node(id).expect("queued node exists").edges_out().to_vec();
            for eid in out {
                let target = self.edge(eid).expect("adjacency lists hold live edges").to();
                let neighbor = self.node_mut(target).expect("edge target exists");
                if neighbor.color() == VisitColor::Unvisited {
                    neighbor.state.color = VisitColor::Visiting;
                    neighbor.state.distance = parent_distance + 1.0;
                    neighbor.state.predecessor = Some(id);
                    queue.push_back(target);
                }
            }
        }
    }

    /// Depth-first traversal from `start`, visiting nodes in recursive
    /// pre-order but driven by an explicit stack so deep graphs cannot
    /// exhaust the call stack.
    ///
    /// Every reached node gets `distance` = walk depth from `start` and
    /// `predecessor` = the node that discovered it.  Returns `true` if the
    /// walk re-reached a node still being visited, i.e. found a back edge
    /// closing a cycle.
    pub fn dfs(&mut self, start: NodeId) -> Result<bool, GraphError> {
        self.dfs_with(start, |_| {})
    }

    /// Like [`dfs`](Self::dfs), invoking `visit` once per node on first
    /// discovery.
    pub fn dfs_with(
        &mut self,
        start: NodeId,
        mut visit: impl FnMut(&Node<T>),
    ) -> Result<bool, GraphError> {
        self.node(start).ok_or(GraphError::UnknownNode(start))?;
        self.ensure_cleared();
        debug!(?start, "dfs");
        let found_cycle = self.dfs_from(start, &mut visit);
        self.set_traversed(true);
        Ok(found_cycle)
    }

    fn dfs_from(&mut self, start: NodeId, visit: &mut impl FnMut(&Node<T>)) -> bool {
        let mut found_cycle = false;
        let root = self.node_mut(start).expect("start node belongs to this store");
        root.state.color = VisitColor::Visiting;
        root.state.distance = 0.0;
        visit(self.node(start).expect("start node belongs to this store"));
        // (node, index of the next outgoing edge to follow)
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        while let Some(&(id, next)) = stack.last() {
            let eid = self
                .node(id)
                .expect("stacked node exists")
                .edges_out()
                .get(next)
                .copied();
            let Some(eid) = eid else {
                self.node_mut(id).expect("stacked node exists").state.color = VisitColor::Done;
                stack.pop();
                continue;
            };
            stack.last_mut().expect("stack is non-empty").1 += 1;
            let target = self.edge(eid).expect("adjacency lists hold live edges").to();
            match self.node(target).expect("edge target exists").color() {
                VisitColor::Unvisited => {
                    let depth = self.node(id).expect("stacked node exists").distance() + 1.0;
                    let neighbor = self.node_mut(target).expect("edge target exists");
                    neighbor.state.color = VisitColor::Visiting;
                    neighbor.state.distance = depth;
                    neighbor.state.predecessor = Some(id);
                    visit(self.node(target).expect("edge target exists"));
                    stack.push((target, 0));
                }
                VisitColor::Visiting => {
                    trace!(?id, ?target, "back edge");
                    found_cycle = true;
                }
                VisitColor::Done => {}
            }
        }
        found_cycle
    }

    /// Whether any cycle is reachable by forward edges.
    ///
    /// Runs DFS from every undiscovered node in store order and reports a
    /// cycle the moment any step re-reaches a node still being visited.
    /// Traversal state is cleared before and after, so the store is not left
    /// flagged as traversed and the method is safe to call repeatedly.
    pub fn contains_cycle(&mut self) -> bool {
        self.clear_traversal_state();
        let ids: Vec<NodeId> = self.node_ids().collect();
        let mut found = false;
        for id in ids {
            if self.node(id).expect("id from this store").color() == VisitColor::Unvisited
                && self.dfs_from(id, &mut |_| {})
            {
                found = true;
                break;
            }
        }
        self.clear_traversal_state();
        found
    }

    /// Number of connectivity components, counted by repeated forward
    /// traversal: BFS runs from every undiscovered node in store order and
    /// each initiation counts one component.
    ///
    /// Only outgoing edges are followed, so this counts components reachable
    /// via directed forward traversal in store order, not true undirected
    /// connectivity.  The single-component preconditions of
    /// [`jarnik`](Self::jarnik) and [`bellman_ford`](Self::bellman_ford) are
    /// defined in terms of this exact count.
    pub fn connectivity_components(&mut self) -> usize {
        self.clear_traversal_state();
        let ids: Vec<NodeId> = self.node_ids().collect();
        let mut components = 0;
        for id in ids {
            if self.node(id).expect("id from this store").color() == VisitColor::Unvisited {
                components += 1;
                self.bfs_from(id, &mut |_| {});
            }
        }
        self.clear_traversal_state();
        components
    }

    /// Single-source shortest paths by Dijkstra's algorithm.
    ///
    /// Each reachable node ends with `distance` = the length of the
    /// shortest path from `start` and `predecessor` = the previous node on
    /// that path; unreachable nodes keep an infinite distance.
    ///
    /// Negative edge weights are not rejected, but results are not
    /// guaranteed correct in their presence — the standard Dijkstra
    /// limitation.  Use [`bellman_ford`](Self::bellman_ford) when negative
    /// weights matter.
    pub fn dijkstra(&mut self, start: NodeId) -> Result<(), GraphError> {
        debug!(?start, "dijkstra");
        self.relax_traversal(start, &ShortestPath)
    }

    /// Minimum spanning tree by the Jarnik/Prim algorithm.
    ///
    /// Requires a non-empty graph with exactly one connectivity component
    /// (as counted by [`connectivity_components`](Self::connectivity_components)).
    /// Runs the same priority-relaxation machinery as Dijkstra, but with
    /// [`LightestEdge`] relaxation, then reconstructs the tree from each
    /// non-root node's predecessor link and recorded distance — which under
    /// that relaxation is the connecting edge's weight, not a path length.
    pub fn jarnik(&mut self) -> Result<Vec<MstEdge>, GraphError> {
        if self.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        let components = self.connectivity_components();
        if components != 1 {
            return Err(GraphError::Disconnected(components));
        }
        let root = self.node_at(0)?.id();
        debug!(?root, "jarnik");
        self.relax_traversal(root, &LightestEdge)?;
        let mut tree = Vec::with_capacity(self.len() - 1);
        for node in self.nodes() {
            if let Some(pred) = node.predecessor() {
                tree.push(MstEdge {
                    from: pred,
                    to: node.id(),
                    weight: node.distance(),
                });
            }
        }
        Ok(tree)
    }

    /// Single-source shortest paths by Bellman-Ford, with negative-cycle
    /// detection.
    ///
    /// Requires exactly one connectivity component.  Performs `|V| - 1` full
    /// relaxation passes over every finite-distance node's outgoing edges,
    /// then one detection pass; if any edge still relaxes, a negative-weight
    /// cycle exists and the call fails with [`GraphError::NegativeCycle`],
    /// leaving traversal state undefined.
    pub fn bellman_ford(&mut self, start: NodeId) -> Result<(), GraphError> {
        self.node(start).ok_or(GraphError::UnknownNode(start))?;
        let components = self.connectivity_components();
        if components != 1 {
            return Err(GraphError::Disconnected(components));
        }
        debug!(?start, "bellman-ford");
        self.node_mut(start).expect("start node belongs to this store").state.distance = 0.0;
        for _ in 1..self.len() {
            self.relax_all_edges();
        }
        if self.relax_all_edges() {
            return Err(GraphError::NegativeCycle);
        }
        self.set_traversed(true);
        Ok(())
    }

    /// One full relaxation pass.  Returns whether any distance improved.
    fn relax_all_edges(&mut self) -> bool {
        let mut improved = false;
        let ids: Vec<NodeId> = self.node_ids().collect();
        for id in ids {
            if self.node(id).expect("id from this store").distance().is_infinite() {
                continue;
            }
            let out = self.node(id).expect("id from this store").edges_out().to_vec();
            for eid in out {
                let edge = self.edge(eid).expect("adjacency lists hold live edges").clone();
                let source_distance = self.node(id).expect("id from this store").distance();
                let target_distance =
                    self.node(edge.to()).expect("edge target exists").distance();
                if let Some(new_distance) =
                    ShortestPath.relax(source_distance, &edge, target_distance)
                {
                    let target = self.node_mut(edge.to()).expect("edge target exists");
                    target.state.distance = new_distance;
                    target.state.predecessor = Some(id);
                    improved = true;
                }
            }
        }
        improved
    }

    /// The shared priority-relaxation routine behind Dijkstra and Jarnik.
    ///
    /// Loads every node into a distance-ordered [`IndexedHeap`] whose
    /// position observer writes each node's current slot into its traversal
    /// state.  When popping surfaces an infinite distance the remaining
    /// nodes are unreachable and the run stops early.  A successful
    /// relaxation updates the target in place through `replace_on_index`
    /// using its cached slot — the O(log n) decrease-key.
    fn relax_traversal(
        &mut self,
        start: NodeId,
        strategy: &impl Relaxation,
    ) -> Result<(), GraphError> {
        self.node(start).ok_or(GraphError::UnknownNode(start))?;
        self.ensure_cleared();
        self.node_mut(start).expect("start node belongs to this store").state.distance = 0.0;
        let entries: Vec<HeapEntry> = self
            .nodes()
            .map(|node| HeapEntry {
                node: node.id(),
                distance: node.distance(),
            })
            .collect();
        let mut heap = IndexedHeap::with_capacity(entries.len(), by_distance);
        heap.push_range(entries, &mut SlotWriter(self));
        loop {
            let entry = match heap.pop(&mut SlotWriter(self)) {
                Ok(entry) => entry,
                Err(_) => break,
            };
            self.node_mut(entry.node)
                .expect("popped node belongs to this store")
                .state
                .heap_slot = SETTLED;
            if entry.distance.is_infinite() {
                // The minimum is unreachable, so everything left is too.
                break;
            }
            let out = self.node(entry.node).expect("popped node exists").edges_out().to_vec();
            for eid in out {
                let edge = self.edge(eid).expect("adjacency lists hold live edges").clone();
                let target = edge.to();
                if self.node(target).expect("edge target exists").state.heap_slot == SETTLED {
                    continue;
                }
                let source_distance =
                    self.node(entry.node).expect("popped node exists").distance();
                let target_distance = self.node(target).expect("edge target exists").distance();
                if let Some(improved) = strategy.relax(source_distance, &edge, target_distance) {
                    let slot;
                    {
                        let node = self.node_mut(target).expect("edge target exists");
                        node.state.distance = improved;
                        node.state.predecessor = Some(entry.node);
                        slot = node.state.heap_slot;
                    }
                    trace!(?target, improved, "relaxed");
                    heap.replace_on_index(
                        slot,
                        HeapEntry {
                            node: target,
                            distance: improved,
                        },
                        &mut SlotWriter(self),
                    );
                }
            }
        }
        self.set_traversed(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use quickcheck_macros::quickcheck;

    use super::*;

    /// a -> b -> c, a -> c, plus an isolated d.
    fn diamond_with_stray() -> (GraphStore<&'static str>, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        let d = store.add_node("d");
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, c, 1.0).unwrap();
        store.add_edge(a, c, 1.0).unwrap();
        (store, vec![a, b, c, d])
    }

    fn visit_order<T>(store: &mut GraphStore<T>, start: NodeId, depth_first: bool) -> Vec<NodeId> {
        let mut order = Vec::new();
        if depth_first {
            store.dfs_with(start, |node| order.push(node.id())).unwrap();
        } else {
            store.bfs_with(start, |node| order.push(node.id())).unwrap();
        }
        order
    }

    #[test]
    fn bfs_sets_edge_count_distances() {
        let (mut store, ids) = diamond_with_stray();
        let order = visit_order(&mut store, ids[0], false);
        assert_eq!(order, vec![ids[0], ids[1], ids[2]]);
        assert_eq!(store.node(ids[0]).unwrap().distance(), 0.0);
        assert_eq!(store.node(ids[1]).unwrap().distance(), 1.0);
        // c is discovered directly from a before b gets to it.
        assert_eq!(store.node(ids[2]).unwrap().distance(), 1.0);
        assert_eq!(store.node(ids[2]).unwrap().predecessor(), Some(ids[0]));
        assert!(store.node(ids[3]).unwrap().distance().is_infinite());
        assert!(store.is_traversed());
    }

    #[test]
    fn bfs_rejects_foreign_start() {
        let (mut store, _) = diamond_with_stray();
        let mut other = GraphStore::new();
        let stranger = other.add_node("x");
        assert_eq!(
            store.bfs(stranger),
            Err(GraphError::UnknownNode(stranger))
        );
    }

    #[test]
    fn consecutive_runs_clear_stale_state() {
        let (mut store, ids) = diamond_with_stray();
        store.bfs(ids[0]).unwrap();
        assert!(store.is_traversed());
        store.bfs(ids[1]).unwrap();
        // A fresh run from b must not see a's results.
        assert!(store.node(ids[0]).unwrap().distance().is_infinite());
        assert_eq!(store.node(ids[1]).unwrap().distance(), 0.0);
    }

    #[test]
    fn dfs_visits_in_preorder_with_depth_distances() {
        let mut store = GraphStore::new();
        let a = store.add_node(0);
        let b = store.add_node(1);
        let c = store.add_node(2);
        let d = store.add_node(3);
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, d, 1.0).unwrap();
        store.add_edge(a, c, 1.0).unwrap();
        let order = visit_order(&mut store, a, true);
        // First edge out of a leads to b, whose subtree finishes before c.
        assert_eq!(order, vec![a, b, d, c]);
        assert_eq!(store.node(d).unwrap().distance(), 2.0);
        assert_eq!(store.node(d).unwrap().predecessor(), Some(b));
        assert_eq!(store.node(c).unwrap().distance(), 1.0);
    }

    #[test]
    fn dfs_reports_back_edges() {
        let mut store = GraphStore::new();
        let a = store.add_node(0);
        let b = store.add_node(1);
        let c = store.add_node(2);
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, c, 1.0).unwrap();
        store.add_edge(c, a, 1.0).unwrap();
        assert!(store.dfs(a).unwrap());
        store.clear_traversal_state();
        store.remove_edge(store.node(c).unwrap().edges_out()[0]).unwrap();
        assert!(!store.dfs(a).unwrap());
    }

    #[test]
    fn contains_cycle_finds_cycles_anywhere() {
        let mut store = GraphStore::new();
        let a = store.add_node(0);
        let b = store.add_node(1);
        let c = store.add_node(2);
        let d = store.add_node(3);
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(c, d, 1.0).unwrap();
        store.add_edge(d, c, 1.0).unwrap();
        assert!(store.contains_cycle());
        // Repeated calls observe the same answer and leave no state behind.
        assert!(store.contains_cycle());
        assert!(!store.is_traversed());
        assert!(store.node(a).unwrap().distance().is_infinite());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut store = GraphStore::new();
        let a = store.add_node(0);
        store.add_edge(a, a, 1.0).unwrap();
        assert!(store.contains_cycle());
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let (mut store, _) = diamond_with_stray();
        assert!(!store.contains_cycle());
    }

    #[test]
    fn counts_connectivity_components() {
        let (mut store, _) = diamond_with_stray();
        // a reaches b and c; d stands alone.
        assert_eq!(store.connectivity_components(), 2);
        assert!(!store.is_traversed());
    }

    #[test]
    fn component_count_is_forward_reachability_in_store_order() {
        let mut store = GraphStore::new();
        let a = store.add_node(0);
        let b = store.add_node(1);
        // Only b -> a; the scan starts at a, which reaches nothing.
        store.add_edge(b, a, 1.0).unwrap();
        assert_eq!(store.connectivity_components(), 2);
    }

    #[test]
    fn dijkstra_prefers_lighter_paths() {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        store.add_edge(a, b, 10.0).unwrap();
        store.add_edge(a, c, 1.0).unwrap();
        store.add_edge(c, b, 2.0).unwrap();
        store.dijkstra(a).unwrap();
        assert_eq!(store.node(b).unwrap().distance(), 3.0);
        assert_eq!(store.node(b).unwrap().predecessor(), Some(c));
        assert!(store.is_traversed());
    }

    #[test]
    fn dijkstra_leaves_unreachable_nodes_infinite() {
        let (mut store, ids) = diamond_with_stray();
        store.dijkstra(ids[0]).unwrap();
        assert!(store.node(ids[3]).unwrap().distance().is_infinite());
        assert_eq!(store.node(ids[3]).unwrap().predecessor(), None);
    }

    #[test]
    fn jarnik_requires_nonempty_single_component() {
        let mut empty: GraphStore<i32> = GraphStore::new();
        assert_eq!(empty.jarnik().unwrap_err(), GraphError::EmptyGraph);
        let (mut store, _) = diamond_with_stray();
        assert_eq!(store.jarnik().unwrap_err(), GraphError::Disconnected(2));
    }

    #[test]
    fn jarnik_picks_lightest_connecting_edges() {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        store.add_edge(a, b, 4.0).unwrap();
        store.add_edge(a, c, 1.0).unwrap();
        store.add_edge(c, b, 2.0).unwrap();
        // Back edges keep the component count at one from every scan start.
        store.add_edge(b, a, 4.0).unwrap();
        store.add_edge(c, a, 1.0).unwrap();
        store.add_edge(b, c, 2.0).unwrap();
        let mut tree = store.jarnik().unwrap();
        tree.sort_by(|x, y| x.weight.total_cmp(&y.weight));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].weight, 1.0);
        assert_eq!(tree[1].weight, 2.0);
        let total: f64 = tree.iter().map(|edge| edge.weight).sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn bellman_ford_matches_dijkstra_on_nonnegative_weights() {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        store.add_edge(a, b, 5.0).unwrap();
        store.add_edge(a, c, 2.0).unwrap();
        store.add_edge(c, b, 1.0).unwrap();
        store.add_edge(b, a, 5.0).unwrap();
        store.add_edge(c, a, 2.0).unwrap();
        store.dijkstra(a).unwrap();
        let dijkstra: Vec<(f64, Option<NodeId>)> = store
            .nodes()
            .map(|node| (node.distance(), node.predecessor()))
            .collect();
        store.bellman_ford(a).unwrap();
        let bellman: Vec<(f64, Option<NodeId>)> = store
            .nodes()
            .map(|node| (node.distance(), node.predecessor()))
            .collect();
        assert_eq!(dijkstra, bellman);
    }

    #[test]
    fn bellman_ford_handles_negative_edges_without_cycle() {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        store.add_edge(a, b, 4.0).unwrap();
        store.add_edge(a, c, 6.0).unwrap();
        store.add_edge(b, c, -3.0).unwrap();
        store.bellman_ford(a).unwrap();
        assert_eq!(store.node(c).unwrap().distance(), 1.0);
        assert_eq!(store.node(c).unwrap().predecessor(), Some(b));
    }

    #[test]
    fn bellman_ford_detects_negative_cycles() {
        let mut store = GraphStore::new();
        let a = store.add_node("a");
        let b = store.add_node("b");
        let c = store.add_node("c");
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, c, -2.0).unwrap();
        store.add_edge(c, b, 1.0).unwrap();
        assert_eq!(store.bellman_ford(a).unwrap_err(), GraphError::NegativeCycle);
    }

    #[test]
    fn bellman_ford_rejects_disconnected_graphs() {
        let (mut store, ids) = diamond_with_stray();
        assert_eq!(
            store.bellman_ford(ids[0]).unwrap_err(),
            GraphError::Disconnected(2)
        );
    }

    /// Builds a store with `n` nodes and edges decoded from arbitrary pairs,
    /// all with unit weight.
    fn unit_weight_store(n: usize, pairs: &[(usize, usize)]) -> GraphStore<usize> {
        let mut store = GraphStore::new();
        let ids: Vec<NodeId> = (0..n).map(|value| store.add_node(value)).collect();
        for &(from, to) in pairs {
            store
                .add_edge(ids[from % n], ids[to % n], 1.0)
                .expect("endpoints are in range");
        }
        store
    }

    #[quickcheck]
    fn prop_dijkstra_agrees_with_bfs_on_unit_weights(
        n: usize,
        pairs: Vec<(usize, usize)>,
    ) -> bool {
        let n = n % 12 + 1;
        let mut store = unit_weight_store(n, &pairs);
        let start = store.node_at(0).unwrap().id();
        store.bfs(start).unwrap();
        let bfs: Vec<f64> = store.nodes().map(|node| node.distance()).collect();
        store.dijkstra(start).unwrap();
        let dijkstra: Vec<f64> = store.nodes().map(|node| node.distance()).collect();
        bfs == dijkstra
    }

    #[quickcheck]
    fn prop_contains_cycle_matches_brute_force(n: usize, pairs: Vec<(usize, usize)>) -> bool {
        let n = n % 8 + 1;
        let mut store = unit_weight_store(n, &pairs);
        // Brute force: a cycle exists iff some node can reach itself by one
        // or more forward edges.
        let reachable = |store: &GraphStore<usize>, from: NodeId| -> HashSet<NodeId> {
            let mut seen = HashSet::new();
            let mut frontier = vec![from];
            while let Some(id) = frontier.pop() {
                for &eid in store.node(id).unwrap().edges_out() {
                    let to = store.edge(eid).unwrap().to();
                    if seen.insert(to) {
                        frontier.push(to);
                    }
                }
            }
            seen
        };
        let expected = store
            .node_ids()
            .collect::<Vec<_>>()
            .into_iter()
            .any(|id| reachable(&store, id).contains(&id));
        store.contains_cycle() == expected
    }

    #[quickcheck]
    fn prop_component_count_on_disjoint_chains(chains: Vec<u8>) -> bool {
        // Each entry builds one isolated chain of (len % 4 + 1) nodes.
        let chains: Vec<usize> = chains.into_iter().take(6).map(|c| c as usize % 4 + 1).collect();
        if chains.is_empty() {
            return true;
        }
        let mut store = GraphStore::new();
        for &len in &chains {
            let ids: Vec<NodeId> = (0..len).map(|value| store.add_node(value)).collect();
            for window in ids.windows(2) {
                store.add_edge(window[0], window[1], 1.0).unwrap();
            }
        }
        store.connectivity_components() == chains.len()
    }
}
