//! Dense indexing for downstream analyses.
//!
//! Node ids are sparse once nodes have been merged or removed. Analyses that
//! want flat arrays map live nodes to contiguous indices `0..n` (in node
//! insertion order) through [`DenseIndex`].

use petgraph::graph::{DiGraph, NodeIndex};
use qg_core::{NodeId, QgError, QgResult};

use crate::graph::Graph;

/// Bidirectional mapping between live `NodeId`s and contiguous indices.
#[derive(Debug, Clone)]
pub struct DenseIndex {
    /// Contiguous list of node ids (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Reverse lookup: NodeId slot -> index.
    /// Sized to max(slot) + 1; None for merged, removed or unknown slots.
    node_to_idx: Vec<Option<usize>>,
}

impl DenseIndex {
    pub fn from_graph(graph: &Graph) -> Self {
        let node_ids: Vec<NodeId> = graph.nodes().to_vec();

        let max_slot = node_ids.iter().map(|id| id.slot()).max().unwrap_or(0);
        let mut node_to_idx = vec![None; max_slot + 1];
        for (i, id) in node_ids.iter().enumerate() {
            node_to_idx[id.slot()] = Some(i);
        }

        Self {
            node_ids,
            node_to_idx,
        }
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Contiguous index of a node.
    pub fn node_idx(&self, id: NodeId) -> QgResult<usize> {
        self.node_to_idx
            .get(id.slot())
            .copied()
            .flatten()
            .ok_or_else(|| QgError::NotFound {
                what: "NodeId",
                key: id.to_string(),
            })
    }

    /// Node at a contiguous index.
    pub fn node_id(&self, index: usize) -> QgResult<NodeId> {
        self.node_ids
            .get(index)
            .copied()
            .ok_or(QgError::IndexOob {
                what: "dense node index",
                index,
                len: self.node_ids.len(),
            })
    }

    /// All node ids in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}

/// Copy the graph into a `petgraph` digraph weighted by display labels.
///
/// Node `i` of the result is `index.node_id(i)`.
pub fn to_petgraph(graph: &Graph) -> (DiGraph<String, ()>, DenseIndex) {
    let index = DenseIndex::from_graph(graph);
    let mut out = DiGraph::with_capacity(index.len(), graph.edge_count());

    for &id in index.node_ids() {
        out.add_node(graph.label(id).unwrap_or_default().to_string());
    }
    for (_, edge) in graph.edges() {
        if let (Ok(s), Ok(t)) = (index.node_idx(edge.source()), index.node_idx(edge.target())) {
            out.add_edge(NodeIndex::new(s), NodeIndex::new(t), ());
        }
    }
    (out, index)
}
