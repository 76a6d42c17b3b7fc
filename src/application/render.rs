//! Text rendering of trees with `termtree`.

use std::collections::HashSet;
use std::fmt::Display;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::{Decomposition, Graph, NodeId};

/// Deepest level `tree_view` renders below its root. Anything further down is
/// replaced by a single [`TRUNCATED`] leaf so the nested `termtree::Tree`
/// stays shallow enough to format and drop.
pub const MAX_RENDER_DEPTH: usize = 256;

/// Leaf shown where deeper levels were cut off.
pub const TRUNCATED: &str = "...";

/// Renders the part of `graph` reachable from `root` as a tree, using each
/// node's `Display` as its label.
///
/// Children are the neighbors of a node minus the one it was reached from.
/// Nodes already shown are skipped, so a cyclic graph still renders.
#[instrument(level = "debug", skip(graph))]
pub fn tree_view<N: Display, E>(graph: &Graph<N, E>, root: NodeId) -> Tree<String> {
    tree_view_with(graph, root, |_, data| data.to_string())
}

/// Same as [`tree_view`] with a custom label function.
pub fn tree_view_with<N, E, F>(graph: &Graph<N, E>, root: NodeId, label: F) -> Tree<String>
where
    F: Fn(NodeId, &N) -> String,
{
    let text = |id: NodeId| {
        graph
            .get_node(id)
            .map(|node| label(id, &node.data))
            .unwrap_or_else(|| format!("<missing {}>", id))
    };

    let mut shown: HashSet<NodeId> = HashSet::new();
    shown.insert(root);
    let mut tree = Tree::new(text(root));
    build_tree_representation(graph, root, None, 0, &mut tree, &mut shown, &text);
    tree
}

fn build_tree_representation<N, E>(
    graph: &Graph<N, E>,
    node: NodeId,
    parent: Option<NodeId>,
    depth: usize,
    parent_tree: &mut Tree<String>,
    shown: &mut HashSet<NodeId>,
    text: &dyn Fn(NodeId) -> String,
) {
    let Ok(neighbors) = graph.neighbors(node) else {
        return;
    };
    let children: Vec<NodeId> = neighbors
        .filter(|&n| Some(n) != parent && !shown.contains(&n))
        .collect();
    if children.is_empty() {
        return;
    }
    if depth >= MAX_RENDER_DEPTH {
        debug!("tree_view: truncated below {}", node);
        parent_tree.push(Tree::new(TRUNCATED.to_string()));
        return;
    }
    for child in children {
        if !shown.insert(child) {
            continue;
        }
        let mut child_tree = Tree::new(text(child));
        build_tree_representation(
            graph,
            child,
            Some(node),
            depth + 1,
            &mut child_tree,
            shown,
            text,
        );
        parent_tree.push(child_tree);
    }
}

/// Renders a decomposition hierarchy from its global centroid.
pub fn decomposition_view<N: Display>(decomposition: &Decomposition<N>) -> Tree<String> {
    let tree = &decomposition.tree;
    match tree.root() {
        Some(root) => tree_view_with(tree.graph(), root, |id, data| match tree.level(id) {
            Some(level) => format!("{} (level {})", data, level),
            None => data.to_string(),
        }),
        None => Tree::new("Empty tree".to_string()),
    }
}
