//! Balanced centroid search over the unmarked part of a tree.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::{Graph, NodeId};

/// Nodes already consumed as centroids.
///
/// A marked node is treated as removed by every traversal in this module,
/// which lets a decomposition run without mutating the source graph.
#[derive(Debug, Clone, Default)]
pub struct MarkedSet {
    nodes: HashSet<NodeId>,
}

impl MarkedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `node` was already marked.
    pub fn mark(&mut self, node: NodeId) -> bool {
        self.nodes.insert(node)
    }

    pub fn is_marked(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of one centroid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    pub node: NodeId,
    /// Number of unmarked nodes reachable from the search root.
    pub component_size: usize,
}

/// Subtree sizes of the unmarked component hanging off a root.
#[derive(Debug, Default)]
struct SubtreeSizes {
    total: usize,
    sizes: HashMap<NodeId, usize>,
}

impl SubtreeSizes {
    fn of(&self, node: NodeId) -> usize {
        self.sizes.get(&node).copied().unwrap_or(0)
    }
}

/// Unmarked neighbors of `node` other than `parent`.
fn children<'a, N, E>(
    graph: &'a Graph<N, E>,
    node: NodeId,
    parent: Option<NodeId>,
    marked: &'a MarkedSet,
) -> DomainResult<impl Iterator<Item = NodeId> + 'a> {
    Ok(graph
        .neighbors(node)?
        .filter(move |&n| Some(n) != parent && !marked.is_marked(n)))
}

/// Finds the centroid of the component containing `root`, ignoring marked
/// nodes.
///
/// Removing the returned node leaves every remaining piece of the component
/// with at most `component_size / 2` nodes. When two nodes qualify the one
/// reached first from `root` wins; ties between equally heavy children go to
/// the earlier neighbor.
#[instrument(level = "debug", skip(graph, marked))]
pub fn find_centroid<N, E>(
    graph: &Graph<N, E>,
    root: NodeId,
    marked: &MarkedSet,
) -> DomainResult<Centroid> {
    if !graph.contains_node(root) {
        return Err(DomainError::UnknownNode(root));
    }
    if marked.is_marked(root) {
        return Err(DomainError::MarkedRoot(root));
    }

    let sizes = subtree_sizes(graph, root, marked)?;
    let half = sizes.total / 2;

    let mut current = root;
    let mut parent: Option<NodeId> = None;
    loop {
        let mut heaviest: Option<(NodeId, usize)> = None;
        let mut balanced = true;
        for child in children(graph, current, parent, marked)? {
            let size = sizes.of(child);
            if size > half {
                balanced = false;
            }
            if heaviest.map_or(true, |(_, max)| size > max) {
                heaviest = Some((child, size));
            }
        }

        let rest = sizes.total - sizes.of(current);
        if balanced && rest <= half {
            trace!(
                "find_centroid: {} is centroid of {} nodes",
                current,
                sizes.total
            );
            return Ok(Centroid {
                node: current,
                component_size: sizes.total,
            });
        }

        match heaviest {
            Some((next, _)) => {
                parent = Some(current);
                current = next;
            }
            None => {
                return Err(DomainError::Internal(format!(
                    "centroid descent stalled at leaf {}",
                    current
                )))
            }
        }
    }
}

/// Post-order sizing pass from `root`; iterative so long paths cannot
/// exhaust the call stack.
fn subtree_sizes<N, E>(
    graph: &Graph<N, E>,
    root: NodeId,
    marked: &MarkedSet,
) -> DomainResult<SubtreeSizes> {
    let mut result = SubtreeSizes::default();
    let mut discovered: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<(NodeId, Option<NodeId>, bool)> = vec![(root, None, false)];
    discovered.insert(root);

    while let Some((current, parent, expanded)) = stack.pop() {
        if expanded {
            let size = 1 + children(graph, current, parent, marked)?
                .map(|child| result.of(child))
                .sum::<usize>();
            result.sizes.insert(current, size);
            continue;
        }

        result.total += 1;
        stack.push((current, parent, true));
        for child in children(graph, current, parent, marked)? {
            if !discovered.insert(child) {
                return Err(DomainError::CycleDetected(child));
            }
            stack.push((child, Some(current), false));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> (Graph<usize, ()>, Vec<NodeId>) {
        let mut g = Graph::new();
        let ids: Vec<NodeId> = (0..n).map(|i| g.add_node(i)).collect();
        for pair in ids.windows(2) {
            g.add_edge((), pair[0], pair[1]).unwrap();
        }
        (g, ids)
    }

    #[test]
    fn given_path_of_five_when_finding_from_end_then_middle_is_centroid() {
        let (g, ids) = path(5);
        let c = find_centroid(&g, ids[0], &MarkedSet::new()).unwrap();
        assert_eq!(c.node, ids[2]);
        assert_eq!(c.component_size, 5);
    }

    #[test]
    fn given_marked_middle_when_finding_from_left_then_search_stays_left() {
        let (g, ids) = path(5);
        let mut marked = MarkedSet::new();
        marked.mark(ids[2]);
        let c = find_centroid(&g, ids[1], &marked).unwrap();
        assert_eq!(c.component_size, 2);
        assert_eq!(c.node, ids[1]);
    }

    #[test]
    fn given_marked_root_when_finding_then_precondition_error() {
        let (g, ids) = path(3);
        let mut marked = MarkedSet::new();
        marked.mark(ids[0]);
        assert_eq!(
            find_centroid(&g, ids[0], &marked),
            Err(DomainError::MarkedRoot(ids[0]))
        );
    }

    #[test]
    fn given_cycle_when_finding_then_cycle_detected() {
        let (mut g, ids) = path(3);
        g.add_edge((), ids[2], ids[0]).unwrap();
        assert!(matches!(
            find_centroid(&g, ids[0], &MarkedSet::new()),
            Err(DomainError::CycleDetected(_))
        ));
    }

    #[test]
    fn given_single_node_then_it_is_its_own_centroid() {
        let (g, ids) = path(1);
        let c = find_centroid(&g, ids[0], &MarkedSet::new()).unwrap();
        assert_eq!(c.node, ids[0]);
        assert_eq!(c.component_size, 1);
    }
}
