//! Canonicalizing label index.
//!
//! Every label is bound to the node that was created for it. Merging two
//! nodes is a union-find `union`: the absorbed node gets a parent pointer to
//! the survivor, and resolving a label is a `find` that walks the parent
//! chain from the node the label was first bound to. Live nodes are always
//! roots, so a resolved label names a live node unless its class was
//! forgotten by a removal.
//!
//! Union is not by rank: the caller decides which node survives. Chains are
//! shortened by [`LabelIndex::canonicalize`], which compresses the path it
//! walks; read-only lookups leave the structure untouched.

use std::collections::HashMap;

use qg_core::NodeId;

#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    /// Label -> the node it was bound to (not necessarily a root any more).
    bindings: HashMap<String, NodeId>,
    /// Union-find parent per node slot; `None` for a root.
    parents: Vec<Option<NodeId>>,
    /// Every label resolving to a root, in binding order.
    members: HashMap<NodeId, Vec<String>>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of labels currently resolving to some node.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a label to `node`'s class.
    ///
    /// Rebinding an existing label moves it to `node`'s class. Binding to an
    /// absorbed node files the label under the class representative.
    pub fn bind(&mut self, label: impl Into<String>, node: NodeId) {
        let label = label.into();
        if let Some(old) = self.bindings.get(&label).copied() {
            let old_root = self.root(old);
            if let Some(list) = self.members.get_mut(&old_root) {
                list.retain(|l| *l != label);
            }
        }
        if self.parents.len() <= node.slot() {
            self.parents.resize(node.slot() + 1, None);
        }
        let root = self.root(node);
        self.members.entry(root).or_default().push(label.clone());
        self.bindings.insert(label, node);
    }

    /// Resolve a label to its class representative without compressing.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.bindings.get(label).map(|&node| self.root(node))
    }

    /// Resolve a label and compress the chain it walked, so the next lookup
    /// of any label bound along the chain is a single step.
    pub fn canonicalize(&mut self, label: &str) -> Option<NodeId> {
        let start = *self.bindings.get(label)?;
        let root = self.root(start);

        let mut current = start;
        while let Some(next) = self.parent(current) {
            if let Some(slot) = self.parents.get_mut(current.slot()) {
                *slot = Some(root);
            }
            current = next;
        }
        if let Some(binding) = self.bindings.get_mut(label) {
            *binding = root;
        }
        Some(root)
    }

    /// Union the class of `absorbed` into the class of `survivor`.
    ///
    /// Afterwards every label that resolved to `absorbed` resolves to
    /// `survivor`. A no-op when both already share a class.
    pub fn union(&mut self, survivor: NodeId, absorbed: NodeId) {
        let survivor = self.root(survivor);
        let absorbed = self.root(absorbed);
        if survivor == absorbed {
            return;
        }

        let needed = survivor.slot().max(absorbed.slot()) + 1;
        if self.parents.len() < needed {
            self.parents.resize(needed, None);
        }
        if let Some(slot) = self.parents.get_mut(absorbed.slot()) {
            *slot = Some(survivor);
        }

        let moved = self.members.remove(&absorbed).unwrap_or_default();
        self.members.entry(survivor).or_default().extend(moved);
    }

    /// Drop every label resolving to `node`'s class. Returns the dropped labels.
    pub fn forget(&mut self, node: NodeId) -> Vec<String> {
        let root = self.root(node);
        let labels = self.members.remove(&root).unwrap_or_default();
        for label in &labels {
            self.bindings.remove(label);
        }
        labels
    }

    /// Every label resolving to `node`, in binding order.
    pub fn aliases(&self, node: NodeId) -> &[String] {
        self.members
            .get(&self.root(node))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All labels with the node each one currently resolves to.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.bindings
            .iter()
            .map(|(label, &node)| (label.as_str(), self.root(node)))
    }

    /// Number of parent hops from the node `label` is bound to up to its root.
    pub fn depth(&self, label: &str) -> Option<usize> {
        let mut current = *self.bindings.get(label)?;
        let mut hops = 0;
        while let Some(next) = self.parent(current) {
            current = next;
            hops += 1;
        }
        Some(hops)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(node.slot()).copied().flatten()
    }

    fn root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(next) = self.parent(current) {
            current = next;
        }
        current
    }
}
