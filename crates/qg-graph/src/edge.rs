//! Directed edges.

use qg_core::NodeId;

/// A directed connection between two nodes.
///
/// Edges are never built by callers: they come into existence when a target
/// is added to a node and disappear when one of their endpoints is detached.
/// The same edge id is listed once in the source's outgoing list and once in
/// the target's incoming list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
}

impl Edge {
    pub(crate) fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// True for an edge whose source and target are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_loop_detection() {
        let a = NodeId::from_index(0);
        let b = NodeId::from_index(1);
        assert!(Edge::new(a, a).is_self_loop());
        assert!(!Edge::new(a, b).is_self_loop());
        assert_eq!(Edge::new(a, b).target(), b);
    }
}
