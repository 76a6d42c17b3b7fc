//! Tests for the arena-backed graph container

use centroid::domain::{DomainError, Graph, NodeId};
use centroid::util::testing;
use rstest::{fixture, rstest};

type Labelled = Graph<&'static str, f64>;

/// Star with center `a` and leaves `b`, `c`, `d`.
#[fixture]
fn star() -> (Labelled, Vec<NodeId>) {
    testing::init_test_setup();
    let mut g = Graph::new();
    let ids: Vec<NodeId> = ["a", "b", "c", "d"].iter().map(|l| g.add_node(*l)).collect();
    for &leaf in &ids[1..] {
        g.add_edge(1.0, ids[0], leaf).unwrap();
    }
    (g, ids)
}

// ============================================================
// Insertion
// ============================================================

#[rstest]
fn given_new_node_then_it_has_no_edges(star: (Labelled, Vec<NodeId>)) {
    let (mut g, _) = star;
    let e = g.add_node("e");
    assert_eq!(g.degree(e).unwrap(), 0);
    assert_eq!(g.neighbors(e).unwrap().count(), 0);
    assert_eq!(g.node_count(), 5);
}

#[rstest]
fn given_adjacent_pair_when_adding_edge_then_no_edge_and_count_unchanged(
    star: (Labelled, Vec<NodeId>),
) {
    let (mut g, ids) = star;
    let before = g.edge_count();
    assert_eq!(g.add_edge(2.0, ids[1], ids[0]).unwrap(), None);
    assert_eq!(g.edge_count(), before);
    // the original payload survives
    let edge = g.edge_between(ids[0], ids[1]).unwrap();
    assert_eq!(g.get_edge(edge).unwrap().data, 1.0);
}

#[rstest]
fn given_self_loop_when_adding_edge_then_rejected(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    assert_eq!(
        g.add_edge(1.0, ids[2], ids[2]),
        Err(DomainError::SelfLoop(ids[2]))
    );
    assert_eq!(g.edge_count(), 3);
}

#[rstest]
fn given_removed_node_when_adding_edge_then_unknown_node(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    g.remove_node(ids[3]).unwrap();
    assert_eq!(
        g.add_edge(1.0, ids[1], ids[3]),
        Err(DomainError::UnknownNode(ids[3]))
    );
}

// ============================================================
// Queries
// ============================================================

#[rstest]
fn given_star_then_neighbors_follow_edge_insertion_order(star: (Labelled, Vec<NodeId>)) {
    let (g, ids) = star;
    let neighbors: Vec<NodeId> = g.neighbors(ids[0]).unwrap().collect();
    assert_eq!(neighbors, ids[1..].to_vec());
    assert_eq!(g.neighbors(ids[2]).unwrap().collect::<Vec<_>>(), vec![ids[0]]);
}

#[rstest]
fn given_star_then_edge_between_is_symmetric(star: (Labelled, Vec<NodeId>)) {
    let (g, ids) = star;
    let forward = g.edge_between(ids[0], ids[2]);
    assert!(forward.is_some());
    assert_eq!(forward, g.edge_between(ids[2], ids[0]));
    assert_eq!(g.edge_between(ids[1], ids[2]), None);
}

#[rstest]
fn given_star_then_edges_compare_by_endpoints(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    let first = g.edge_between(ids[0], ids[1]).unwrap();
    g.get_edge_mut(first).unwrap().data = 42.0;
    let a = g.get_edge(first).unwrap();
    let b = g.get_edge(g.edge_between(ids[0], ids[2]).unwrap()).unwrap();
    assert_ne!(a, b);
    assert_eq!(a.other_endpoint(ids[1]), ids[0]);
    assert_eq!(a.endpoints(), (ids[0], ids[1]));
}

#[rstest]
fn given_payload_update_then_node_data_changes(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    g.get_node_mut(ids[1]).unwrap().data = "renamed";
    let labels: Vec<&str> = g.nodes().map(|(_, n)| n.data).collect();
    assert_eq!(labels, vec!["a", "renamed", "c", "d"]);
}

// ============================================================
// Removal
// ============================================================

#[rstest]
fn given_node_with_k_edges_when_removed_then_counts_drop_by_k_and_one(
    star: (Labelled, Vec<NodeId>),
) {
    let (mut g, ids) = star;
    let k = g.degree(ids[0]).unwrap();
    let (nodes, edges) = (g.node_count(), g.edge_count());

    assert_eq!(g.remove_node(ids[0]).unwrap(), "a");

    assert_eq!(g.node_count(), nodes - 1);
    assert_eq!(g.edge_count(), edges - k);
    for &leaf in &ids[1..] {
        assert_eq!(g.degree(leaf).unwrap(), 0);
    }
    assert!(!g.contains_node(ids[0]));
}

#[rstest]
fn given_edge_when_removed_then_both_endpoints_forget_it(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    let edge = g.edge_between(ids[0], ids[1]).unwrap();
    g.remove_edge(edge).unwrap();

    assert!(!g.contains_edge(edge));
    assert!(!g.are_adjacent(ids[0], ids[1]));
    assert!(!g.get_node(ids[0]).unwrap().incident_edges().contains(&edge));
    assert!(g.get_node(ids[1]).unwrap().incident_edges().is_empty());
    assert_eq!(g.remove_edge(edge), Err(DomainError::UnknownEdge(edge)));
}

#[rstest]
fn given_removed_edge_when_re_adding_then_allowed(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    let edge = g.edge_between(ids[0], ids[1]).unwrap();
    g.remove_edge(edge).unwrap();
    let again = g.add_edge(3.0, ids[1], ids[0]).unwrap();
    assert!(again.is_some());
    assert_ne!(again, Some(edge));
}

// ============================================================
// Acyclicity and connectivity
// ============================================================

#[test]
fn given_empty_graph_then_acyclic_connected_tree() {
    let g: Labelled = Graph::new();
    assert!(g.is_acyclic());
    assert!(g.is_connected());
    assert!(g.is_tree());
}

#[rstest]
fn given_tree_when_extra_edge_closes_cycle_then_not_acyclic(star: (Labelled, Vec<NodeId>)) {
    let (mut g, ids) = star;
    assert!(g.is_acyclic());
    assert!(g.is_tree());
    g.add_edge(1.0, ids[1], ids[2]).unwrap();
    assert!(!g.is_acyclic());
    assert!(!g.is_tree());
}

#[rstest]
fn given_cycle_in_second_component_then_detected(star: (Labelled, Vec<NodeId>)) {
    let (mut g, _) = star;
    let x = g.add_node("x");
    let y = g.add_node("y");
    let z = g.add_node("z");
    g.add_edge(1.0, x, y).unwrap();
    g.add_edge(1.0, y, z).unwrap();
    assert!(g.is_acyclic());
    assert!(!g.is_connected());
    g.add_edge(1.0, z, x).unwrap();
    assert!(!g.is_acyclic());
}

#[rstest]
fn given_forest_then_acyclic_but_not_tree(star: (Labelled, Vec<NodeId>)) {
    let (mut g, _) = star;
    g.add_node("lonely");
    assert!(g.is_acyclic());
    assert!(!g.is_connected());
    assert!(!g.is_tree());
}
