//! qg-graph: the quotient graph engine.
//!
//! Provides:
//! - A directed graph of labelled nodes with duplicate-free edges
//! - A canonicalizing label index (union-find) that survives merges
//! - Merge/unionize operations for collapsing equivalent nodes
//! - Invariant validation, dot export, and dense indexing
//!
//! # Example
//!
//! ```
//! use qg_graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph.make_nodes("B", "C");
//! graph.make_nodes("A", "B");
//!
//! let a = graph.node_at_label("A").unwrap();
//! let b = graph.node_at_label("B").unwrap();
//! let c = graph.node_at_label("C").unwrap();
//! graph.merge(a, b);
//!
//! assert!(graph.has_edge(a, c));
//! assert_eq!(graph.node_at_label("B"), Some(a));
//! assert_eq!(graph.node_count(), 2);
//! ```

pub(crate) mod arena;
pub mod dot;
pub mod edge;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod labels;
pub mod merge;
pub mod node;
pub mod validate;

// Re-exports for ergonomics
pub use dot::DotStyle;
pub use edge::Edge;
pub use error::{GraphError, GraphResult};
pub use graph::Graph;
pub use indexing::{DenseIndex, to_petgraph};
pub use labels::LabelIndex;
pub use merge::{Equivalence, FirstNeighbor, Never, SameSuccessors};
pub use node::Node;
pub use qg_core::{EdgeId, NodeId};
pub use validate::validate_graph;
