//! Quotient operations: collapsing equivalent nodes.
//!
//! [`Graph::merge`] is the primitive: the survivor takes over every edge and
//! every label of the absorbed node, which is then reclaimed. What makes two
//! nodes equivalent is not decided here; [`Graph::unionize`] asks an
//! [`Equivalence`] policy supplied by the calling analysis.

use qg_core::NodeId;
use tracing::{debug, info};

use crate::error::GraphResult;
use crate::graph::Graph;

/// Decides whether `target` may be collapsed into `candidate`.
///
/// `candidate` is always an out-neighbor of the source under consideration.
/// Any `Fn(&Graph, NodeId, NodeId) -> bool` closure is a policy.
pub trait Equivalence {
    fn equivalent(&self, graph: &Graph, candidate: NodeId, target: NodeId) -> bool;
}

impl<F> Equivalence for F
where
    F: Fn(&Graph, NodeId, NodeId) -> bool,
{
    fn equivalent(&self, graph: &Graph, candidate: NodeId, target: NodeId) -> bool {
        self(graph, candidate, target)
    }
}

/// Accepts the first out-neighbor unconditionally.
///
/// This reproduces the historical rule and is almost never what an analysis
/// wants; it exists so that old behavior can be replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNeighbor;

impl Equivalence for FirstNeighbor {
    fn equivalent(&self, _graph: &Graph, _candidate: NodeId, _target: NodeId) -> bool {
        true
    }
}

/// Accepts a candidate whose out-neighbor set equals the target's.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameSuccessors;

impl Equivalence for SameSuccessors {
    fn equivalent(&self, graph: &Graph, candidate: NodeId, target: NodeId) -> bool {
        let mut left = graph.successors(candidate);
        let mut right = graph.successors(target);
        left.sort_unstable();
        right.sort_unstable();
        left == right
    }
}

/// Never merges; `relate` then degrades to a plain edge insertion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Equivalence for Never {
    fn equivalent(&self, _graph: &Graph, _candidate: NodeId, _target: NodeId) -> bool {
        false
    }
}

impl Graph {
    /// Collapse `absorbed` into `survivor`.
    ///
    /// 1. `survivor` gains an edge to every out-neighbor of `absorbed`.
    /// 2. Every in-neighbor of `absorbed` gains an edge to `survivor`.
    /// 3. `survivor` displays the label of `absorbed`, and every label that
    ///    resolved to `absorbed` now resolves to `survivor`.
    /// 4. `absorbed` is detached and reclaimed.
    ///
    /// Edges between the two nodes, and self-loops on `absorbed`, become
    /// self-loops on `survivor`. Duplicate targets are coalesced. Merging a
    /// node with itself does nothing.
    ///
    /// # Panics
    ///
    /// Panics if either id is not a live node.
    pub fn merge(&mut self, survivor: NodeId, absorbed: NodeId) {
        self.assert_live(survivor, "merge");
        self.assert_live(absorbed, "merge");
        if survivor == absorbed {
            return;
        }
        info!(
            survivor = %survivor,
            absorbed = %absorbed,
            survivor_label = self.label(survivor).unwrap_or_default(),
            absorbed_label = self.label(absorbed).unwrap_or_default(),
            "merging nodes"
        );

        // Copying may add survivor -> absorbed; it is redirected below and
        // dropped with the absorbed node.
        let copied = self.arena.add_targets_of_other(survivor, absorbed);
        for source in self.arena.predecessors(absorbed) {
            let source = if source == absorbed { survivor } else { source };
            self.arena.add_target(source, survivor);
        }

        self.take_labels(survivor, absorbed);
        self.reclaim(absorbed);
        debug!(%survivor, copied, "merge complete");
    }

    /// Label-addressed [`Graph::merge`]. Returns the survivor.
    ///
    /// Fails with `UnknownLabel` (and changes nothing) if either label is
    /// unregistered.
    pub fn merge_labels(&mut self, survivor: &str, absorbed: &str) -> GraphResult<NodeId> {
        let survivor = self.require(survivor)?;
        let absorbed = self.require(absorbed)?;
        self.merge(survivor, absorbed);
        Ok(survivor)
    }

    /// Collapse `target` into the first out-neighbor of `source` that
    /// `policy` accepts.
    ///
    /// Candidates are tried in edge insertion order; `target` itself is never
    /// a candidate. Returns the node that absorbed `target`, or `None` if no
    /// candidate was accepted (the graph is then unchanged).
    ///
    /// # Panics
    ///
    /// Panics if either id is not a live node.
    pub fn unionize(
        &mut self,
        source: NodeId,
        target: NodeId,
        policy: &impl Equivalence,
    ) -> Option<NodeId> {
        self.assert_live(source, "unionize");
        self.assert_live(target, "unionize");

        let candidate = self
            .successors(source)
            .into_iter()
            .filter(|&child| child != target)
            .find(|&child| policy.equivalent(self, child, target))?;

        self.merge(candidate, target);
        Some(candidate)
    }

    /// Assert the relation `source -> target`, collapsing `target` into an
    /// equivalent out-neighbor of `source` when `policy` finds one.
    ///
    /// Returns the node `source` now points to for this relation: the
    /// survivor of the merge, or `target` when a plain edge was added.
    ///
    /// # Panics
    ///
    /// Panics if either id is not a live node.
    pub fn relate(&mut self, source: NodeId, target: NodeId, policy: &impl Equivalence) -> NodeId {
        match self.unionize(source, target, policy) {
            Some(survivor) => survivor,
            None => {
                self.connect(source, target);
                target
            }
        }
    }

    // The survivor displays the newest label; the index keeps all of them.
    fn take_labels(&mut self, survivor: NodeId, absorbed: NodeId) {
        if let Some(label) = self.label(absorbed).map(str::to_owned) {
            if let Some(node) = self.arena.node_mut(survivor) {
                node.label = label;
            }
        }
        self.labels.union(survivor, absorbed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Graph, NodeId, NodeId, NodeId) {
        // A -> B -> C
        let mut graph = Graph::new();
        graph.make_nodes("B", "C");
        graph.make_nodes("A", "B");
        let a = graph.node_at_label("A").unwrap();
        let b = graph.node_at_label("B").unwrap();
        let c = graph.node_at_label("C").unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn merge_chain_keeps_forward_edge() {
        let (mut graph, a, b, c) = chain();
        graph.merge(a, b);

        assert!(!graph.contains(b));
        assert!(graph.has_edge(a, c));
        // The A -> B edge collapses onto the survivor.
        assert!(graph.has_edge(a, a));
        assert_eq!(graph.node_at_label("B"), Some(a));
        assert_eq!(graph.node_at_label("A"), Some(a));
        assert_eq!(graph.label(a), Some("B"));
        assert_eq!(graph.aliases(a), &["A", "B"]);
    }

    #[test]
    fn merge_redirects_incoming_edges() {
        let mut graph = Graph::new();
        let p = graph.make_nodes("P", "B");
        let q = graph.make_nodes("Q", "B");
        let a = graph.make_node("A");
        let b = graph.node_at_label("B").unwrap();

        graph.merge(a, b);
        assert_eq!(graph.successors(p), vec![a]);
        assert_eq!(graph.successors(q), vec![a]);
        assert_eq!(graph.predecessors(a), vec![p, q]);
        assert!(!graph.has_edge(a, a));
    }

    #[test]
    fn merge_coalesces_shared_targets() {
        let mut graph = Graph::new();
        let a = graph.make_nodes("A", "T");
        let b = graph.make_nodes("B", "T");
        let t = graph.node_at_label("T").unwrap();

        graph.merge(a, b);
        assert_eq!(graph.successors(a), vec![t]);
        assert_eq!(graph.predecessors(t), vec![a]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn merge_moves_self_loop() {
        let mut graph = Graph::new();
        let a = graph.make_node("A");
        let b = graph.make_nodes("B", "B");
        graph.merge(a, b);
        assert!(graph.has_edge(a, a));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn merge_with_itself_is_a_no_op() {
        let (mut graph, a, _, _) = chain();
        graph.merge(a, a);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn labels_follow_chains_of_merges() {
        let mut graph = Graph::new();
        let x = graph.make_node("X");
        let y = graph.make_node("Y");
        let z = graph.make_node("Z");
        graph.merge(y, z);
        graph.merge(x, y);

        for label in ["X", "Y", "Z"] {
            assert_eq!(graph.node_at_label(label), Some(x));
        }
        assert_eq!(graph.label(x), Some("Z"));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn merge_labels_reports_unknown() {
        let mut graph = Graph::new();
        graph.make_node("A");
        assert!(graph.merge_labels("A", "nope").is_err());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn unionize_with_first_neighbor_merges_into_first_child() {
        let mut graph = Graph::new();
        let s = graph.make_nodes("S", "C1");
        graph.make_nodes("S", "C2");
        let c1 = graph.node_at_label("C1").unwrap();
        let t = graph.make_node("T");

        assert_eq!(graph.unionize(s, t, &FirstNeighbor), Some(c1));
        assert_eq!(graph.node_at_label("T"), Some(c1));
        assert!(!graph.contains(t));
    }

    #[test]
    fn unionize_without_match_changes_nothing() {
        let mut graph = Graph::new();
        let s = graph.make_nodes("S", "C");
        let t = graph.make_node("T");
        assert_eq!(graph.unionize(s, t, &Never), None);
        assert!(graph.contains(t));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unionize_uses_closure_policy() {
        let mut graph = Graph::new();
        let s = graph.make_nodes("S", "int");
        graph.make_nodes("S", "str");
        let str_ = graph.node_at_label("str").unwrap();
        let t = graph.make_node("string");

        let same_prefix = |g: &Graph, candidate: NodeId, target: NodeId| {
            let (Some(a), Some(b)) = (g.label(candidate), g.label(target)) else {
                return false;
            };
            b.starts_with(a)
        };
        assert_eq!(graph.unionize(s, t, &same_prefix), Some(str_));
        assert_eq!(graph.node_at_label("string"), Some(str_));
    }

    #[test]
    fn relate_falls_back_to_an_edge() {
        let mut graph = Graph::new();
        let s = graph.make_nodes("S", "C");
        let t = graph.make_nodes("T", "X");
        assert_eq!(graph.relate(s, t, &SameSuccessors), t);
        assert!(graph.has_edge(s, t));

        let u = graph.make_nodes("U", "X");
        let t_again = graph.relate(s, u, &SameSuccessors);
        assert_eq!(t_again, t);
        assert!(!graph.contains(u));
        assert_eq!(graph.node_at_label("U"), Some(t));
    }
}
