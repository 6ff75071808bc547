//! Slot storage for nodes and edges.
//!
//! Nodes and edges live in two vectors indexed by their ids. Removing
//! either one leaves a tombstone (`None`) behind so ids are never reused and
//! a stale id can always be detected.
//!
//! All edge creation funnels through [`Arena::add_target`], which is the only
//! place that enforces the no-duplicate-edge rule. All edge destruction
//! funnels through [`Arena::detach`], which unlinks a node from every
//! neighbor before its edges are tombstoned.

use qg_core::{EdgeId, NodeId};

use crate::edge::Edge;
use crate::node::Node;

#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    live_nodes: usize,
    live_edges: usize,
}

impl Arena {
    pub(crate) fn insert_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Some(Node::new(label)));
        self.live_nodes += 1;
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.slot()).and_then(Option::as_mut)
    }

    pub(crate) fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot()).and_then(Option::as_ref)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn live_nodes(&self) -> usize {
        self.live_nodes
    }

    pub(crate) fn live_edges(&self) -> usize {
        self.live_edges
    }

    /// Live nodes in slot order.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId::from_index(i as u32), n)))
    }

    /// Live edges in slot order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EdgeId::from_index(i as u32), e)))
    }

    /// The edge from `source` to `target`, if there is one.
    pub(crate) fn find_edge(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        let node = self.node(source)?;
        node.out_edges
            .iter()
            .copied()
            .find(|&e| self.edge(e).is_some_and(|edge| edge.target() == target))
    }

    pub(crate) fn already_has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.find_edge(source, target).is_some()
    }

    /// Link `source` to `target` unless they are already linked.
    ///
    /// Returns the id of the new or pre-existing edge, or `None` when either
    /// endpoint is not a live node (nothing is modified in that case).
    pub(crate) fn add_target(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if !self.contains(source) || !self.contains(target) {
            return None;
        }
        if let Some(existing) = self.find_edge(source, target) {
            return Some(existing);
        }

        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(Some(Edge::new(source, target)));
        self.live_edges += 1;

        if let Some(node) = self.node_mut(source) {
            node.out_edges.push(id);
        }
        if let Some(node) = self.node_mut(target) {
            node.in_edges.push(id);
        }
        Some(id)
    }

    /// Give `this` an edge to every out-neighbor of `other`.
    ///
    /// Returns the number of edges that did not exist before.
    pub(crate) fn add_targets_of_other(&mut self, this: NodeId, other: NodeId) -> usize {
        let before = self.live_edges;
        for target in self.successors(other) {
            self.add_target(this, target);
        }
        self.live_edges - before
    }

    /// Out-neighbors in edge insertion order.
    pub(crate) fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| {
                node.out_edges
                    .iter()
                    .filter_map(|&e| self.edge(e).map(Edge::target))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// In-neighbors in edge insertion order.
    pub(crate) fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| {
                node.in_edges
                    .iter()
                    .filter_map(|&e| self.edge(e).map(Edge::source))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unlink `id` from all of its neighbors and tombstone its edges.
    ///
    /// The node stays live with empty edge lists. Returns the number of edges
    /// removed; a self-loop counts once.
    pub(crate) fn detach(&mut self, id: NodeId) -> usize {
        let Some(node) = self.node_mut(id) else {
            return 0;
        };
        let in_edges = std::mem::take(&mut node.in_edges);
        let out_edges = std::mem::take(&mut node.out_edges);

        let mut removed = 0;
        for edge_id in in_edges {
            if let Some(edge) = self.take_edge(edge_id) {
                if !edge.is_self_loop() {
                    if let Some(source) = self.node_mut(edge.source()) {
                        source.remove_out_edge(edge_id);
                    }
                }
                removed += 1;
            }
        }
        for edge_id in out_edges {
            // Self-loops were already taken through the incoming list.
            if let Some(edge) = self.take_edge(edge_id) {
                if !edge.is_self_loop() {
                    if let Some(target) = self.node_mut(edge.target()) {
                        target.remove_in_edge(edge_id);
                    }
                }
                removed += 1;
            }
        }
        removed
    }

    /// Detach `id` and release its slot.
    pub(crate) fn reclaim(&mut self, id: NodeId) -> Option<Node> {
        self.detach(id);
        let node = self.nodes.get_mut(id.slot()).and_then(Option::take)?;
        self.live_nodes -= 1;
        Some(node)
    }

    fn take_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.slot()).and_then(Option::take)?;
        self.live_edges -= 1;
        Some(edge)
    }
}
