//! The graph: live nodes, their edges, and the label index.

use qg_core::{EdgeId, NodeId};
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::labels::LabelIndex;
use crate::node::Node;

/// A directed graph of labelled nodes that can be progressively collapsed.
///
/// The graph stores:
/// - Nodes and edges in an arena keyed by stable ids (see `arena`).
/// - The live nodes in insertion order, which fixes export order.
/// - A label index resolving every label ever assigned to the node that
///   currently represents it.
///
/// Node ids handed out by the graph stay valid until the node is removed or
/// merged away. Passing a stale id to an operation documented to panic is a
/// caller bug; lookups and label-addressed operations never panic.
///
/// `Clone` produces an independent deep copy.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) arena: Arena,
    pub(crate) order: Vec<NodeId>,
    pub(crate) labels: LabelIndex,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical node for `label`, creating it if needed.
    ///
    /// Calling this twice with the same label returns the same node and does
    /// not grow the graph.
    pub fn make_node(&mut self, label: &str) -> NodeId {
        if let Some(existing) = self.labels.find(label) {
            return existing;
        }
        let id = self.arena.insert_node(label);
        self.labels.bind(label, id);
        self.order.push(id);
        debug!(%label, node = %id, "created node");
        id
    }

    /// Ensure a node for `source` exists and link it to the node for `target`.
    ///
    /// The target must already be registered; otherwise nothing is created
    /// and `UnknownLabel` is returned. Use [`Graph::make_nodes`] when the
    /// target may not exist yet.
    pub fn make_node_with_target(&mut self, source: &str, target: &str) -> GraphResult<NodeId> {
        let Some(target_id) = self.labels.find(target) else {
            warn!(%source, %target, "target label registered after its source");
            return Err(GraphError::UnknownLabel {
                label: target.to_string(),
            });
        };
        let source_id = self.make_node(source);
        self.connect(source_id, target_id);
        Ok(source_id)
    }

    /// Ensure nodes for both labels exist and link `source` to `target`.
    ///
    /// Returns the source node.
    pub fn make_nodes(&mut self, source: &str, target: &str) -> NodeId {
        let target_id = self.make_node(target);
        let source_id = self.make_node(source);
        self.connect(source_id, target_id);
        source_id
    }

    /// Link `source` to the node registered for `label`, creating and
    /// registering that node if needed. Returns the target node.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not a live node.
    pub fn add_target_label(&mut self, source: NodeId, label: &str) -> NodeId {
        self.assert_live(source, "add_target_label");
        let target = self.make_node(label);
        self.connect(source, target);
        target
    }

    /// Link the nodes registered for two labels.
    ///
    /// Fails with `UnknownLabel` (and changes nothing) if either label is
    /// unregistered. Linking an already linked pair returns the existing edge.
    pub fn create_edge(&mut self, source: &str, target: &str) -> GraphResult<EdgeId> {
        let source_id = self.require(source)?;
        let target_id = self.require(target)?;
        Ok(self.connect(source_id, target_id))
    }

    /// Link `source` to `target` unless they are already linked.
    ///
    /// Returns the new or pre-existing edge.
    ///
    /// # Panics
    ///
    /// Panics if either id is not a live node.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.assert_live(source, "connect");
        self.assert_live(target, "connect");
        match self.arena.add_target(source, target) {
            Some(edge) => {
                debug!(%source, %target, %edge, "linked nodes");
                edge
            }
            None => panic!("connect: cannot link {source} to {target}"),
        }
    }

    /// Remove the node registered for `label`.
    ///
    /// Every label resolving to the node is dropped from the index. Returns
    /// false (and does nothing) if the label is not registered.
    pub fn remove_node(&mut self, label: &str) -> bool {
        match self.labels.find(label) {
            Some(id) => self.remove_node_id(id),
            None => false,
        }
    }

    /// Remove a node by id. Returns false if the id is not a live node.
    pub fn remove_node_id(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let forgotten = self.labels.forget(id);
        self.reclaim(id);
        info!(node = %id, labels = ?forgotten, "removed node");
        true
    }

    /// Create (or reuse) the node for `new_label` and give it an edge to
    /// every out-neighbor of the node for `old_label`.
    ///
    /// Incoming edges are not copied. Fails with `UnknownLabel` if
    /// `old_label` is not registered.
    pub fn clone_node(&mut self, new_label: &str, old_label: &str) -> GraphResult<NodeId> {
        let old = self.require(old_label)?;
        let new = self.make_node(new_label);
        let added = self.arena.add_targets_of_other(new, old);
        debug!(%new_label, %old_label, added, "cloned outgoing edges");
        Ok(new)
    }

    /// Unlink `id` from every neighbor, leaving it live and isolated.
    ///
    /// Returns the number of edges removed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live node.
    pub fn detach(&mut self, id: NodeId) -> usize {
        self.assert_live(id, "detach");
        self.arena.detach(id)
    }

    /// Resolve a label to its canonical node.
    pub fn node_at_label(&self, label: &str) -> Option<NodeId> {
        self.labels.find(label)
    }

    /// Resolve a label, shortening its union-find chain for later lookups.
    pub fn canonicalize(&mut self, label: &str) -> Option<NodeId> {
        self.labels.canonicalize(label)
    }

    /// Resolve a label or report it as unknown.
    pub fn require(&self, label: &str) -> GraphResult<NodeId> {
        self.labels
            .find(label)
            .ok_or_else(|| GraphError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Every label resolving to `id`, in the order they were registered.
    pub fn aliases(&self, id: NodeId) -> &[String] {
        if !self.contains(id) {
            return &[];
        }
        self.labels.aliases(id)
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.labels
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.node(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.arena.edge(id)
    }

    /// Current display label of a node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.arena.node(id).map(Node::label)
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// Live edges in export order: by source insertion, then out-edge order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.order.iter().flat_map(move |&id| {
            self.arena
                .node(id)
                .map(|node| node.out_edges())
                .unwrap_or(&[])
                .iter()
                .filter_map(move |&e| self.arena.edge(e).map(|edge| (e, edge)))
        })
    }

    pub fn node_count(&self) -> usize {
        self.arena.live_nodes()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.live_edges()
    }

    /// Number of labels currently resolving to a node.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if `source` has an edge to `target`.
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.arena.already_has_edge(source, target)
    }

    /// Out-neighbors of `id` in edge insertion order.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.arena.successors(id)
    }

    /// In-neighbors of `id` in edge insertion order.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.arena.predecessors(id)
    }

    /// Detach a node, release its slot, and drop it from the node order.
    ///
    /// Labels are left to the caller: removal forgets them, merge unions
    /// them into the survivor first.
    pub(crate) fn reclaim(&mut self, id: NodeId) {
        self.arena.reclaim(id);
        if let Some(pos) = self.order.iter().position(|&n| n == id) {
            self.order.remove(pos);
        }
    }

    pub(crate) fn assert_live(&self, id: NodeId, op: &str) {
        assert!(self.contains(id), "{op}: node {id} is not live");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_node_is_idempotent() {
        let mut graph = Graph::new();
        let a = graph.make_node("A");
        let again = graph.make_node("A");
        assert_eq!(a, again);
        assert_eq!(graph.nodes(), &[a]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn make_node_with_target_requires_registered_target() {
        let mut graph = Graph::new();
        let err = graph.make_node_with_target("X", "Y").unwrap_err();
        assert_eq!(err, GraphError::UnknownLabel { label: "Y".into() });
        assert!(graph.is_empty());

        let y = graph.make_node("Y");
        let x = graph.make_node_with_target("X", "Y").unwrap();
        assert!(graph.has_edge(x, y));

        // Existing source: only an edge is added.
        let z = graph.make_node("Z");
        graph.make_node_with_target("Z", "Y").unwrap();
        assert!(graph.has_edge(z, y));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn add_target_label_registers_the_new_node() {
        let mut graph = Graph::new();
        let a = graph.make_node("A");
        let b = graph.add_target_label(a, "B");
        assert_eq!(graph.node_at_label("B"), Some(b));
        assert_eq!(graph.successors(a), vec![b]);
    }

    #[test]
    fn create_edge_reports_unknown_labels() {
        let mut graph = Graph::new();
        graph.make_node("A");
        assert_eq!(
            graph.create_edge("A", "B"),
            Err(GraphError::UnknownLabel { label: "B".into() })
        );
        assert_eq!(
            graph.create_edge("C", "A"),
            Err(GraphError::UnknownLabel { label: "C".into() })
        );
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn create_edge_twice_keeps_one_edge() {
        let mut graph = Graph::new();
        let a = graph.make_node("A");
        let b = graph.make_node("B");
        let first = graph.create_edge("A", "B").unwrap();
        let second = graph.create_edge("A", "B").unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.successors(a), vec![b]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    #[should_panic(expected = "is not live")]
    fn connect_panics_on_stale_node() {
        let mut graph = Graph::new();
        let a = graph.make_node("A");
        let b = graph.make_node("B");
        graph.remove_node_id(b);
        graph.connect(a, b);
    }

    #[test]
    fn remove_node_unlinks_neighbors_and_labels() {
        let mut graph = Graph::new();
        graph.make_nodes("A", "B");
        graph.make_nodes("B", "C");
        let a = graph.node_at_label("A").unwrap();
        let b = graph.node_at_label("B").unwrap();
        let c = graph.node_at_label("C").unwrap();

        assert!(graph.remove_node("B"));
        assert!(!graph.contains(b));
        assert_eq!(graph.node_at_label("B"), None);
        assert!(graph.successors(a).is_empty());
        assert!(graph.predecessors(c).is_empty());
        assert_eq!(graph.nodes(), &[a, c]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_unknown_is_a_no_op() {
        let mut graph = Graph::new();
        graph.make_node("A");
        assert!(!graph.remove_node("missing"));
        let a = graph.node_at_label("A").unwrap();
        assert!(graph.remove_node_id(a));
        assert!(!graph.remove_node_id(a));
    }

    #[test]
    fn removed_label_can_be_registered_again() {
        let mut graph = Graph::new();
        let old = graph.make_node("A");
        graph.remove_node("A");
        let new = graph.make_node("A");
        assert_ne!(old, new);
        assert_eq!(graph.node_at_label("A"), Some(new));
    }

    #[test]
    fn clone_node_copies_outgoing_edges_only() {
        let mut graph = Graph::new();
        graph.make_nodes("A", "B");
        graph.make_nodes("A", "C");
        graph.make_nodes("P", "A");

        let copy = graph.clone_node("A2", "A").unwrap();
        let b = graph.node_at_label("B").unwrap();
        let c = graph.node_at_label("C").unwrap();
        assert_eq!(graph.successors(copy), vec![b, c]);
        assert!(graph.predecessors(copy).is_empty());

        assert_eq!(
            graph.clone_node("Z", "missing"),
            Err(GraphError::UnknownLabel {
                label: "missing".into()
            })
        );
        assert_eq!(graph.node_at_label("Z"), None);
    }

    #[test]
    fn detach_leaves_node_isolated() {
        let mut graph = Graph::new();
        let a = graph.make_nodes("A", "B");
        graph.make_nodes("C", "A");
        assert_eq!(graph.detach(a), 2);
        assert!(graph.contains(a));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_at_label("A"), Some(a));
    }

    #[test]
    fn clone_is_independent() {
        let mut graph = Graph::new();
        graph.make_nodes("A", "B");
        let snapshot = graph.clone();
        graph.remove_node("B");
        assert_eq!(snapshot.edge_count(), 1);
        assert!(snapshot.node_at_label("B").is_some());
    }

    #[test]
    fn edges_follow_node_then_edge_order() {
        let mut graph = Graph::new();
        graph.make_nodes("X", "Y");
        graph.make_nodes("Z", "Y");
        graph.make_nodes("Y", "X");
        let pairs: Vec<(&str, &str)> = graph
            .edges()
            .map(|(_, e)| {
                (
                    graph.label(e.source()).unwrap(),
                    graph.label(e.target()).unwrap(),
                )
            })
            .collect();
        assert_eq!(pairs, vec![("Y", "X"), ("X", "Y"), ("Z", "Y")]);
    }
}
