//! Centroid decomposition: a lazy stream of centroid selections and the
//! hierarchy tree built from it.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::centroid::{find_centroid, MarkedSet};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::{Graph, NodeId};

/// One centroid selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentroidEvent {
    /// Zero-based position in the stream.
    pub step: usize,
    /// Selected centroid, as a handle into the source graph.
    pub centroid: NodeId,
    /// Centroid of the enclosing component, `None` for the global centroid.
    pub parent: Option<NodeId>,
    /// Level in the hierarchy, 0 for the global centroid.
    pub level: usize,
    /// Size of the component the centroid was chosen from.
    pub component_size: usize,
    /// Unmarked neighbors of the centroid; each one enters a component that
    /// is decomposed next.
    pub components: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    entry: NodeId,
    parent: Option<NodeId>,
    level: usize,
}

/// Lazy, ordered, non-restartable stream of [`CentroidEvent`]s.
///
/// Events come out in pre-order of the decomposition recursion: a centroid,
/// then everything inside its first component, then its second component,
/// and so on. The stream borrows the graph, so the graph cannot be mutated
/// while decomposition is in progress. Dropping the stream abandons the run.
pub struct DecompositionEvents<'a, N, E> {
    graph: &'a Graph<N, E>,
    marked: MarkedSet,
    pending: Vec<Pending>,
    step: usize,
    failed: bool,
}

impl<'a, N, E> DecompositionEvents<'a, N, E> {
    /// Stream starting at the first node in insertion order.
    pub fn new(graph: &'a Graph<N, E>) -> Self {
        let pending = graph
            .first_node()
            .map(|entry| Pending {
                entry,
                parent: None,
                level: 0,
            })
            .into_iter()
            .collect();
        Self {
            graph,
            marked: MarkedSet::new(),
            pending,
            step: 0,
            failed: false,
        }
    }

    /// Stream starting at `start`; only the component holding `start` is
    /// decomposed.
    pub fn starting_at(graph: &'a Graph<N, E>, start: NodeId) -> DomainResult<Self> {
        if !graph.contains_node(start) {
            return Err(DomainError::UnknownNode(start));
        }
        Ok(Self {
            graph,
            marked: MarkedSet::new(),
            pending: vec![Pending {
                entry: start,
                parent: None,
                level: 0,
            }],
            step: 0,
            failed: false,
        })
    }

    /// Nodes consumed as centroids so far.
    pub fn marked(&self) -> &MarkedSet {
        &self.marked
    }

    fn advance(&mut self, job: Pending) -> DomainResult<CentroidEvent> {
        let centroid = find_centroid(self.graph, job.entry, &self.marked)?;
        self.marked.mark(centroid.node);

        let components: Vec<NodeId> = self
            .graph
            .neighbors(centroid.node)?
            .filter(|&n| !self.marked.is_marked(n))
            .collect();

        // reversed so the first component is popped first
        for &entry in components.iter().rev() {
            self.pending.push(Pending {
                entry,
                parent: Some(centroid.node),
                level: job.level + 1,
            });
        }

        let event = CentroidEvent {
            step: self.step,
            centroid: centroid.node,
            parent: job.parent,
            level: job.level,
            component_size: centroid.component_size,
            components,
        };
        self.step += 1;
        Ok(event)
    }
}

impl<'a, N, E> Iterator for DecompositionEvents<'a, N, E> {
    type Item = DomainResult<CentroidEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let job = self.pending.pop()?;
        let result = self.advance(job);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Centroid hierarchy built from a source graph.
///
/// Nodes carry clones of the source payloads; edges join a centroid to the
/// centroid of each component it split off.
#[derive(Debug, Clone)]
pub struct DecompositionTree<N> {
    graph: Graph<N, ()>,
    root: Option<NodeId>,
    levels: HashMap<NodeId, usize>,
}

impl<N> Default for DecompositionTree<N> {
    fn default() -> Self {
        Self {
            graph: Graph::new(),
            root: None,
            levels: HashMap::new(),
        }
    }
}

impl<N> DecompositionTree<N> {
    pub fn graph(&self) -> &Graph<N, ()> {
        &self.graph
    }

    pub fn into_graph(self) -> Graph<N, ()> {
        self.graph
    }

    /// Image of the global centroid, `None` for an empty decomposition.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Hierarchy level of a decomposition-tree node.
    pub fn level(&self, node: NodeId) -> Option<usize> {
        self.levels.get(&node).copied()
    }

    /// Number of levels in the hierarchy, 0 when empty.
    pub fn depth(&self) -> usize {
        self.levels.values().max().map_or(0, |deepest| deepest + 1)
    }
}

/// Decomposition tree plus the events it was built from.
#[derive(Debug, Clone)]
pub struct Decomposition<N> {
    pub tree: DecompositionTree<N>,
    pub events: Vec<CentroidEvent>,
}

/// Builds a [`DecompositionTree`] by draining an event stream.
///
/// The source-to-hierarchy node mapping only lives for the duration of the
/// build.
pub struct DecompositionBuilder<'a, N, E> {
    graph: &'a Graph<N, E>,
    tree: DecompositionTree<N>,
    images: HashMap<NodeId, NodeId>,
}

impl<'a, N: Clone, E> DecompositionBuilder<'a, N, E> {
    pub fn new(graph: &'a Graph<N, E>) -> Self {
        Self {
            graph,
            tree: DecompositionTree::default(),
            images: HashMap::new(),
        }
    }

    /// Adds the centroid of `event` to the hierarchy and links it to its
    /// parent centroid.
    pub fn record(&mut self, event: &CentroidEvent) -> DomainResult<NodeId> {
        let data = self
            .graph
            .get_node(event.centroid)
            .ok_or(DomainError::UnknownNode(event.centroid))?
            .data
            .clone();
        let image = self.tree.graph.add_node(data);
        self.images.insert(event.centroid, image);
        self.tree.levels.insert(image, event.level);

        match event.parent {
            None => self.tree.root = Some(image),
            Some(parent) => {
                let parent_image = self.images.get(&parent).copied().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "parent centroid {} recorded after its child {}",
                        parent, event.centroid
                    ))
                })?;
                self.tree.graph.add_edge((), parent_image, image)?;
            }
        }
        Ok(image)
    }

    pub fn finish(self) -> DecompositionTree<N> {
        self.tree
    }
}

/// Decomposes the component of `graph` that contains its first node.
///
/// An empty graph yields an empty decomposition. The caller is responsible
/// for handing in a tree; cyclic input is reported as
/// [`DomainError::CycleDetected`].
#[instrument(level = "debug", skip(graph))]
pub fn decompose<N: Clone, E>(graph: &Graph<N, E>) -> DomainResult<Decomposition<N>> {
    collect(graph, DecompositionEvents::new(graph))
}

/// Like [`decompose`], entering the graph at `start`.
#[instrument(level = "debug", skip(graph))]
pub fn decompose_from<N: Clone, E>(
    graph: &Graph<N, E>,
    start: NodeId,
) -> DomainResult<Decomposition<N>> {
    collect(graph, DecompositionEvents::starting_at(graph, start)?)
}

fn collect<N: Clone, E>(
    graph: &Graph<N, E>,
    stream: DecompositionEvents<'_, N, E>,
) -> DomainResult<Decomposition<N>> {
    let mut builder = DecompositionBuilder::new(graph);
    let mut events = Vec::new();
    for event in stream {
        let event = event?;
        builder.record(&event)?;
        events.push(event);
    }
    let tree = builder.finish();
    debug!(
        "decompose: {} centroids over {} levels",
        events.len(),
        tree.depth()
    );
    Ok(Decomposition { tree, events })
}
