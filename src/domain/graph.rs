use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Stable handle to a node inside one [`Graph`].
///
/// Handles are generational: once a node is removed its handle never
/// resolves again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// Stable handle to an edge inside one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "n{}.{}", slot, generation)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "e{}.{}", slot, generation)
    }
}

/// Vertex record: application payload plus incident edges in insertion order.
#[derive(Debug, Clone)]
pub struct Node<N> {
    pub data: N,
    edges: Vec<EdgeId>,
}

impl<N> Node<N> {
    /// Incident edges, oldest first.
    pub fn incident_edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// Undirected connection between two distinct nodes.
///
/// Equality is structural: two edges are equal when they join the same
/// unordered pair of endpoints, whatever their payloads.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    pub data: E,
    a: NodeId,
    b: NodeId,
}

impl<E> Edge<E> {
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// The endpoint opposite to `node`. Passing a node that is not an
    /// endpoint yields the first endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> NodeId {
        if node == self.a {
            self.b
        } else {
            self.a
        }
    }

    pub fn connects(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }
}

impl<E> PartialEq for Edge<E> {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl<E> Eq for Edge<E> {}

/// Arena-based undirected graph, intended to hold trees.
///
/// Nodes and edges live in two generational arenas; nodes refer to edges and
/// edges to nodes by handle only, so there is no ownership cycle. Insertion
/// order of both collections is tracked separately and is what `nodes()`,
/// `edges()` and `neighbors()` report.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Arena<Node<N>>,
    edges: Arena<Edge<E>>,
    node_order: Vec<NodeId>,
    edge_order: Vec<EdgeId>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            edges: Arena::new(),
            node_order: Vec::new(),
            edge_order: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(node.0)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(edge.0)
    }

    /// First node in insertion order, if any.
    pub fn first_node(&self) -> Option<NodeId> {
        self.node_order.first().copied()
    }

    pub fn get_node(&self, node: NodeId) -> Option<&Node<N>> {
        self.nodes.get(node.0)
    }

    pub fn get_node_mut(&mut self, node: NodeId) -> Option<&mut Node<N>> {
        self.nodes.get_mut(node.0)
    }

    pub fn get_edge(&self, edge: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(edge.0)
    }

    pub fn get_edge_mut(&mut self, edge: EdgeId) -> Option<&mut Edge<E>> {
        self.edges.get_mut(edge.0)
    }

    /// Node handles in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_order.iter().copied()
    }

    /// Edge handles in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_order.iter().copied()
    }

    /// Nodes with their handles, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<N>)> + '_ {
        self.node_order
            .iter()
            .filter_map(move |&id| self.nodes.get(id.0).map(|node| (id, node)))
    }

    /// Edges with their handles, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<E>)> + '_ {
        self.edge_order
            .iter()
            .filter_map(move |&id| self.edges.get(id.0).map(|edge| (id, edge)))
    }

    pub fn degree(&self, node: NodeId) -> DomainResult<usize> {
        self.node_ref(node).map(Node::degree)
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId(self.nodes.insert(Node {
            data,
            edges: Vec::new(),
        }));
        self.node_order.push(id);
        id
    }

    /// Connects `a` and `b`.
    ///
    /// Returns `Ok(None)` when the two nodes are already adjacent; the graph
    /// is left untouched in that case. Self loops and stale handles are errors.
    #[instrument(level = "trace", skip(self, data))]
    pub fn add_edge(&mut self, data: E, a: NodeId, b: NodeId) -> DomainResult<Option<EdgeId>> {
        self.node_ref(a)?;
        self.node_ref(b)?;
        if a == b {
            return Err(DomainError::SelfLoop(a));
        }
        if self.edge_between(a, b).is_some() {
            debug!("add_edge: {} and {} already adjacent", a, b);
            return Ok(None);
        }

        let id = EdgeId(self.edges.insert(Edge { data, a, b }));
        self.edge_order.push(id);
        for endpoint in [a, b] {
            if let Some(node) = self.nodes.get_mut(endpoint.0) {
                node.edges.push(id);
            }
        }
        Ok(Some(id))
    }

    /// Removes `edge` from the graph and from both endpoints' incident lists.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_edge(&mut self, edge: EdgeId) -> DomainResult<E> {
        let removed = self
            .edges
            .remove(edge.0)
            .ok_or(DomainError::UnknownEdge(edge))?;
        for endpoint in [removed.a, removed.b] {
            if let Some(node) = self.nodes.get_mut(endpoint.0) {
                node.edges.retain(|&e| e != edge);
            }
        }
        self.edge_order.retain(|&e| e != edge);
        Ok(removed.data)
    }

    /// Removes `node` together with every edge incident to it.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, node: NodeId) -> DomainResult<N> {
        // snapshot: remove_edge mutates the incident list we would iterate
        let incident = self.node_ref(node)?.edges.clone();
        for edge in incident {
            self.remove_edge(edge)?;
        }
        let removed = self
            .nodes
            .remove(node.0)
            .ok_or(DomainError::UnknownNode(node))?;
        self.node_order.retain(|&n| n != node);
        trace!("remove_node: {} removed", node);
        Ok(removed.data)
    }

    /// Neighbors of `node`, one per incident edge, in edge insertion order.
    pub fn neighbors(&self, node: NodeId) -> DomainResult<Neighbors<'_, N, E>> {
        let record = self.node_ref(node)?;
        Ok(Neighbors {
            graph: self,
            node,
            edges: record.edges.iter(),
        })
    }

    /// Edge joining `a` and `b`, found by scanning `a`'s incident edges.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let node = self.nodes.get(a.0)?;
        node.edges.iter().copied().find(|&e| {
            self.edges
                .get(e.0)
                .map(|edge| edge.other_endpoint(a) == b)
                .unwrap_or(false)
        })
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// True when no component contains a cycle. Every component is searched,
    /// so disconnected forests are accepted.
    #[instrument(level = "debug", skip(self))]
    pub fn is_acyclic(&self) -> bool {
        let mut visited: HashSet<NodeId> = HashSet::with_capacity(self.node_count());
        for start in self.node_ids() {
            if visited.contains(&start) {
                continue;
            }
            if self.has_cycle_from(start, &mut visited) {
                debug!("is_acyclic: cycle reachable from {}", start);
                return false;
            }
        }
        true
    }

    fn has_cycle_from(&self, start: NodeId, visited: &mut HashSet<NodeId>) -> bool {
        let mut stack: Vec<(NodeId, Option<EdgeId>)> = vec![(start, None)];
        visited.insert(start);

        while let Some((current, via)) = stack.pop() {
            let Some(node) = self.nodes.get(current.0) else {
                continue;
            };
            for &edge_id in &node.edges {
                // the edge we arrived through leads back to the parent
                if Some(edge_id) == via {
                    continue;
                }
                let Some(edge) = self.edges.get(edge_id.0) else {
                    continue;
                };
                let neighbor = edge.other_endpoint(current);
                if !visited.insert(neighbor) {
                    return true;
                }
                stack.push((neighbor, Some(edge_id)));
            }
        }
        false
    }

    /// True for the empty graph and for graphs where every node is reachable
    /// from the first one.
    #[instrument(level = "debug", skip(self))]
    pub fn is_connected(&self) -> bool {
        match self.first_node() {
            None => true,
            Some(start) => self.reachable_from(start).len() == self.node_count(),
        }
    }

    /// Connected, acyclic and with exactly `|V| - 1` edges.
    pub fn is_tree(&self) -> bool {
        if self.is_empty() {
            return self.edge_count() == 0;
        }
        self.edge_count() == self.node_count() - 1 && self.is_acyclic() && self.is_connected()
    }

    /// All nodes reachable from `start`, in depth-first discovery order.
    pub fn reachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut order = Vec::new();
        if !self.contains_node(start) {
            return order;
        }
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(current) = stack.pop() {
            order.push(current);
            if let Ok(neighbors) = self.neighbors(current) {
                let next: Vec<NodeId> = neighbors.filter(|n| seen.insert(*n)).collect();
                // reversed so the first neighbor is expanded first
                stack.extend(next.into_iter().rev());
            }
        }
        order
    }

    fn node_ref(&self, node: NodeId) -> DomainResult<&Node<N>> {
        self.nodes.get(node.0).ok_or(DomainError::UnknownNode(node))
    }
}

/// Iterator over the neighbors of one node, see [`Graph::neighbors`].
pub struct Neighbors<'a, N, E> {
    graph: &'a Graph<N, E>,
    node: NodeId,
    edges: std::slice::Iter<'a, EdgeId>,
}

impl<'a, N, E> Iterator for Neighbors<'a, N, E> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        for edge_id in self.edges.by_ref() {
            if let Some(edge) = self.graph.edges.get(edge_id.0) {
                return Some(edge.other_endpoint(self.node));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.edges.len()))
    }
}
