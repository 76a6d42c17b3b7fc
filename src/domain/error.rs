//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::graph::{EdgeId, NodeId};

/// Domain errors represent violated preconditions on the graph or the
/// decomposition. Expected, probe-able outcomes (adjacent `add_edge`,
/// empty decomposition) are values, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),

    #[error("self loop rejected on node: {0}")]
    SelfLoop(NodeId),

    #[error("centroid search rooted at already marked node: {0}")]
    MarkedRoot(NodeId),

    #[error("cycle detected while traversing from node: {0}")]
    CycleDetected(NodeId),

    #[error("internal graph operation failed: {0}")]
    Internal(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
