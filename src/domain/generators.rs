//! Labelled tree shapes for demos and tests.
//!
//! Labels follow insertion order: `n0`, `n1`, ... Every edge has distance 1.

use crate::domain::graph::{Graph, NodeId};
use crate::domain::payload::{EdgeData, NodeData};

pub type LabelledTree = Graph<NodeData, EdgeData>;

fn labelled_nodes(graph: &mut LabelledTree, n: usize) -> Vec<NodeId> {
    (0..n)
        .map(|i| graph.add_node(NodeData::new(format!("n{}", i))))
        .collect()
}

fn link(graph: &mut LabelledTree, a: NodeId, b: NodeId) {
    // fresh nodes of a tree shape: neither a self loop nor a duplicate
    let _ = graph.add_edge(EdgeData::new(1.0), a, b);
}

/// `n0 - n1 - ... - n{n-1}`
pub fn path(n: usize) -> LabelledTree {
    let mut graph = Graph::new();
    let ids = labelled_nodes(&mut graph, n);
    for pair in ids.windows(2) {
        link(&mut graph, pair[0], pair[1]);
    }
    graph
}

/// `n0` joined to every other node.
pub fn star(n: usize) -> LabelledTree {
    let mut graph = Graph::new();
    let ids = labelled_nodes(&mut graph, n);
    if let Some((&center, leaves)) = ids.split_first() {
        for &leaf in leaves {
            link(&mut graph, center, leaf);
        }
    }
    graph
}

/// Complete binary tree with `depth` levels (`2^depth - 1` nodes), in
/// heap order: the children of `n{i}` are `n{2i+1}` and `n{2i+2}`.
pub fn complete_binary(depth: u32) -> LabelledTree {
    let mut graph = Graph::new();
    let n = if depth == 0 { 0 } else { (1usize << depth) - 1 };
    let ids = labelled_nodes(&mut graph, n);
    for child in 1..n {
        link(&mut graph, ids[(child - 1) / 2], ids[child]);
    }
    graph
}
