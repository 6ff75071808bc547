//! Graph-specific error types.

use qg_core::{EdgeId, NodeId, QgError};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Lookup failures and invariant violations reported by the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A label-addressed operation named a label that was never registered
    /// (or whose node has since been removed).
    #[error("Label {label:?} is not registered")]
    UnknownLabel { label: String },

    /// A node's edge list refers to an edge slot that is not live.
    #[error("Node {node} refers to non-existent edge {edge}")]
    DanglingEdge { node: NodeId, edge: EdgeId },

    /// An edge is listed on a node that is not the matching endpoint.
    #[error("Edge {edge} is listed on node {node}, which is not its endpoint")]
    MisplacedEdge { node: NodeId, edge: EdgeId },

    /// A live edge is not listed exactly once on one of its endpoints.
    #[error("Edge {edge} appears {count} times in the edge lists of node {node} (expected 1)")]
    EdgeListCount {
        edge: EdgeId,
        node: NodeId,
        count: usize,
    },

    /// Two outgoing edges of the same node share a target.
    #[error("Node {node} has more than one edge to {target}")]
    DuplicateEdge { node: NodeId, target: NodeId },

    /// An edge endpoint is not a live node.
    #[error("Edge {edge} has an endpoint that is not a live node")]
    DanglingEndpoint { edge: EdgeId },

    /// A label resolves to a node that is no longer live.
    #[error("Label {label:?} resolves to a node that is not live")]
    DanglingLabel { label: String },

    /// The ordered node set disagrees with the set of live nodes.
    #[error("Node order is inconsistent at node {node}")]
    OrderMismatch { node: NodeId },
}

impl From<GraphError> for QgError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownLabel { label } => QgError::NotFound {
                what: "label",
                key: label,
            },
            other => QgError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
