//! Domain layer: graph container and centroid decomposition
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod centroid;
pub mod decompose;
pub mod error;
pub mod generators;
pub mod graph;
pub mod payload;

pub use centroid::{find_centroid, Centroid, MarkedSet};
pub use decompose::{
    decompose, decompose_from, CentroidEvent, Decomposition, DecompositionBuilder,
    DecompositionEvents, DecompositionTree,
};
pub use error::{DomainError, DomainResult};
pub use graph::{Edge, EdgeId, Graph, Neighbors, Node, NodeId};
pub use payload::{EdgeData, NodeData};
