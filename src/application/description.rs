//! TOML tree descriptions
//!
//! ```toml
//! [[nodes]]
//! label = "A"
//! position = [100, 120]
//!
//! [[edges]]
//! from = "A"
//! to = "B"
//! distance = 2.0
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::generators::LabelledTree;
use crate::domain::{EdgeData, Graph, NodeData, NodeId};

/// Edge entry of a description, endpoints named by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Serializable form of a labelled tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDescription {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeSpec>,
}

impl TreeDescription {
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = fs::read_to_string(path).with_path_context("read tree description", path)?;
        Self::parse(&content, path)
    }

    /// Parses `content`; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> ApplicationResult<()> {
        let content = self.to_toml()?;
        fs::write(path, content).with_path_context("write tree description", path)
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string(self).map_err(|e| ApplicationError::Serialize {
            what: "tree description".to_string(),
            message: e.to_string(),
        })
    }

    /// Builds the graph. Missing edge distances fall back to the distance
    /// between the placed endpoints, then to `default_distance`.
    #[instrument(level = "debug", skip(self))]
    pub fn to_graph(&self, default_distance: f64) -> ApplicationResult<LabelledTree> {
        let mut graph = Graph::new();
        let mut by_label: HashMap<&str, NodeId> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if by_label.contains_key(node.label.as_str()) {
                return Err(ApplicationError::DuplicateLabel(node.label.clone()));
            }
            let id = graph.add_node(node.clone());
            by_label.insert(node.label.as_str(), id);
        }

        for spec in &self.edges {
            let lookup = |label: &str| {
                by_label
                    .get(label)
                    .copied()
                    .ok_or_else(|| ApplicationError::UnknownLabel(label.to_string()))
            };
            let from = lookup(&spec.from)?;
            let to = lookup(&spec.to)?;

            let distance = match spec.distance {
                Some(d) => d,
                None => placed_distance(&graph, from, to).unwrap_or(default_distance),
            };
            if graph.add_edge(EdgeData::new(distance), from, to)?.is_none() {
                return Err(ApplicationError::DuplicateEdge {
                    from: spec.from.clone(),
                    to: spec.to.clone(),
                });
            }
        }

        debug!(
            "to_graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Describes `graph`, keeping node and edge insertion order.
    pub fn from_graph(graph: &LabelledTree) -> Self {
        let label = |id: NodeId| {
            graph
                .get_node(id)
                .map(|n| n.data.label.clone())
                .unwrap_or_default()
        };
        let nodes = graph.nodes().map(|(_, node)| node.data.clone()).collect();
        let edges = graph
            .edges()
            .map(|(_, edge)| {
                let (a, b) = edge.endpoints();
                EdgeSpec {
                    from: label(a),
                    to: label(b),
                    distance: Some(edge.data.distance),
                }
            })
            .collect();
        Self { nodes, edges }
    }
}

fn placed_distance(graph: &LabelledTree, a: NodeId, b: NodeId) -> Option<f64> {
    let a = graph.get_node(a)?;
    let b = graph.get_node(b)?;
    a.data.distance_to(&b.data)
}
