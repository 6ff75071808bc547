//! Whole-graph invariant checks.

use std::collections::HashSet;

use qg_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Check every structural invariant of the graph.
///
/// - every edge id listed by a node is live and names that node as the
///   matching endpoint
/// - every live edge is listed exactly once by its source and once by its
///   target
/// - no node has two outgoing edges to the same target
/// - the node order lists each live node exactly once
/// - every label resolves to a live node
pub fn validate_graph(graph: &Graph) -> GraphResult<()> {
    validate_edge_lists(graph)?;
    validate_edges(graph)?;
    validate_order(graph)?;
    validate_labels(graph)
}

fn validate_edge_lists(graph: &Graph) -> GraphResult<()> {
    for (id, node) in graph.arena.nodes() {
        let mut targets: HashSet<NodeId> = HashSet::new();
        for &edge_id in node.out_edges() {
            let edge = graph
                .edge(edge_id)
                .ok_or(GraphError::DanglingEdge { node: id, edge: edge_id })?;
            if edge.source() != id {
                return Err(GraphError::MisplacedEdge { node: id, edge: edge_id });
            }
            if !targets.insert(edge.target()) {
                return Err(GraphError::DuplicateEdge {
                    node: id,
                    target: edge.target(),
                });
            }
        }
        for &edge_id in node.in_edges() {
            let edge = graph
                .edge(edge_id)
                .ok_or(GraphError::DanglingEdge { node: id, edge: edge_id })?;
            if edge.target() != id {
                return Err(GraphError::MisplacedEdge { node: id, edge: edge_id });
            }
        }
    }
    Ok(())
}

fn validate_edges(graph: &Graph) -> GraphResult<()> {
    for (edge_id, edge) in graph.arena.edges() {
        let (Some(source), Some(target)) = (graph.node(edge.source()), graph.node(edge.target()))
        else {
            return Err(GraphError::DanglingEndpoint { edge: edge_id });
        };

        let out_count = source.out_edges().iter().filter(|&&e| e == edge_id).count();
        if out_count != 1 {
            return Err(GraphError::EdgeListCount {
                edge: edge_id,
                node: edge.source(),
                count: out_count,
            });
        }
        let in_count = target.in_edges().iter().filter(|&&e| e == edge_id).count();
        if in_count != 1 {
            return Err(GraphError::EdgeListCount {
                edge: edge_id,
                node: edge.target(),
                count: in_count,
            });
        }
    }
    Ok(())
}

fn validate_order(graph: &Graph) -> GraphResult<()> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    for &id in graph.nodes() {
        if !graph.contains(id) || !seen.insert(id) {
            return Err(GraphError::OrderMismatch { node: id });
        }
    }
    for (id, _) in graph.arena.nodes() {
        if !seen.contains(&id) {
            return Err(GraphError::OrderMismatch { node: id });
        }
    }
    Ok(())
}

fn validate_labels(graph: &Graph) -> GraphResult<()> {
    for (label, node) in graph.label_index().iter() {
        if !graph.contains(node) {
            return Err(GraphError::DanglingLabel {
                label: label.to_string(),
            });
        }
    }
    Ok(())
}
