//! Graph nodes.

use qg_core::EdgeId;

/// A named vertex owning its incident edge lists.
///
/// The label is for display only: identity is the node's `NodeId`, and the
/// graph's label index is what maps names to nodes. After a merge the
/// surviving node displays the most recently absorbed label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) label: String,
    pub(crate) out_edges: Vec<EdgeId>,
    pub(crate) in_edges: Vec<EdgeId>,
}

impl Node {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Outgoing edges in insertion order.
    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    /// Incoming edges in insertion order.
    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    /// Overwrite the display label with another node's label.
    pub(crate) fn take_label(&mut self, other: &Node) {
        self.label.clone_from(&other.label);
    }

    /// Remove `edge` from the incoming list. Returns false if it was not there.
    pub(crate) fn remove_in_edge(&mut self, edge: EdgeId) -> bool {
        remove_by_identity(&mut self.in_edges, edge)
    }

    /// Remove `edge` from the outgoing list. Returns false if it was not there.
    pub(crate) fn remove_out_edge(&mut self, edge: EdgeId) -> bool {
        remove_by_identity(&mut self.out_edges, edge)
    }
}

// Order of the remaining edges is preserved; export depends on it.
fn remove_by_identity(list: &mut Vec<EdgeId>, edge: EdgeId) -> bool {
    match list.iter().position(|&e| e == edge) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(i: u32) -> EdgeId {
        EdgeId::from_index(i)
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut node = Node::new("A");
        node.out_edges = vec![edge(0), edge(1), edge(2)];
        assert!(node.remove_out_edge(edge(1)));
        assert_eq!(node.out_edges(), &[edge(0), edge(2)]);
    }

    #[test]
    fn remove_absent_edge_is_a_no_op() {
        let mut node = Node::new("A");
        node.in_edges = vec![edge(4)];
        assert!(!node.remove_in_edge(edge(5)));
        assert_eq!(node.in_edges(), &[edge(4)]);
    }

    #[test]
    fn take_label_overwrites_display_label() {
        let mut a = Node::new("A");
        let b = Node::new("B");
        a.take_label(&b);
        assert_eq!(a.label(), "B");
    }
}
