//! Relation scripts: a replayable list of graph operations.
//!
//! ```yaml
//! version: 1
//! policy: same_successors
//! ops:
//!   - { op: make_nodes, source: X, target: Y }
//!   - { op: merge, survivor: X, absorbed: Z }
//! ```

use std::path::Path;

use qg_core::{NodeId, QgError};
use qg_graph::{DotStyle, Equivalence, Graph, GraphResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CliError, CliResult};

pub const LATEST_VERSION: u32 = 1;

fn default_version() -> u32 {
    LATEST_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Script {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub policy: PolicyDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<DotStyle>,
    #[serde(default)]
    pub ops: Vec<OpDef>,
}

/// Which equivalence policy `unionize` and `relate` ops use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDef {
    #[default]
    Never,
    FirstNeighbor,
    SameSuccessors,
}

impl Equivalence for PolicyDef {
    fn equivalent(&self, graph: &Graph, candidate: NodeId, target: NodeId) -> bool {
        match self {
            PolicyDef::Never => qg_graph::Never.equivalent(graph, candidate, target),
            PolicyDef::FirstNeighbor => qg_graph::FirstNeighbor.equivalent(graph, candidate, target),
            PolicyDef::SameSuccessors => {
                qg_graph::SameSuccessors.equivalent(graph, candidate, target)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpDef {
    MakeNode { label: String },
    /// Link a (possibly new) source to an already registered target.
    Attach { source: String, target: String },
    MakeNodes { source: String, target: String },
    CreateEdge { source: String, target: String },
    RemoveNode { label: String },
    CloneNode { new_label: String, old_label: String },
    Merge { survivor: String, absorbed: String },
    Unionize { source: String, target: String },
    Relate { source: String, target: String },
}

impl OpDef {
    pub fn name(&self) -> &'static str {
        match self {
            OpDef::MakeNode { .. } => "make_node",
            OpDef::Attach { .. } => "attach",
            OpDef::MakeNodes { .. } => "make_nodes",
            OpDef::CreateEdge { .. } => "create_edge",
            OpDef::RemoveNode { .. } => "remove_node",
            OpDef::CloneNode { .. } => "clone_node",
            OpDef::Merge { .. } => "merge",
            OpDef::Unionize { .. } => "unionize",
            OpDef::Relate { .. } => "relate",
        }
    }

    fn apply(&self, graph: &mut Graph, policy: PolicyDef) -> GraphResult<()> {
        match self {
            OpDef::MakeNode { label } => {
                graph.make_node(label);
            }
            OpDef::Attach { source, target } => {
                graph.make_node_with_target(source, target)?;
            }
            OpDef::MakeNodes { source, target } => {
                graph.make_nodes(source, target);
            }
            OpDef::CreateEdge { source, target } => {
                graph.create_edge(source, target)?;
            }
            OpDef::RemoveNode { label } => {
                graph.remove_node(label);
            }
            OpDef::CloneNode {
                new_label,
                old_label,
            } => {
                graph.clone_node(new_label, old_label)?;
            }
            OpDef::Merge { survivor, absorbed } => {
                graph.merge_labels(survivor, absorbed)?;
            }
            OpDef::Unionize { source, target } => {
                let (s, t) = (graph.require(source)?, graph.require(target)?);
                if let Some(survivor) = graph.unionize(s, t, &policy) {
                    info!(%target, into = graph.label(survivor).unwrap_or_default(), "unionized");
                }
            }
            OpDef::Relate { source, target } => {
                let (s, t) = (graph.require(source)?, graph.require(target)?);
                graph.relate(s, t, &policy);
            }
        }
        Ok(())
    }
}

impl Script {
    /// Replay every op against a fresh graph, stopping at the first failure.
    pub fn replay(&self) -> CliResult<Graph> {
        let mut graph = Graph::new();
        for (index, op) in self.ops.iter().enumerate() {
            op.apply(&mut graph, self.policy)
                .map_err(|error| CliError::Op {
                    index,
                    op: op.name(),
                    error,
                })?;
        }
        info!(
            ops = self.ops.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "replayed script"
        );
        Ok(graph)
    }
}

/// Load a script from a `.yaml`/`.yml` or `.json` file.
pub fn load_script(path: &Path) -> CliResult<Script> {
    let script: Script = load_file(path)?;
    if script.version != LATEST_VERSION {
        return Err(QgError::InvalidArg {
            what: "unsupported script version",
        }
        .into());
    }
    Ok(script)
}

/// Load a dot style override from a `.yaml`/`.yml` or `.json` file.
pub fn load_style(path: &Path) -> CliResult<DotStyle> {
    load_file(path)
}

fn load_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(CliError::Format {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qg_graph::GraphError;

    const CHAIN: &str = "
version: 1
policy: same_successors
ops:
  - { op: make_nodes, source: B, target: C }
  - { op: make_nodes, source: A, target: B }
  - { op: make_node, label: D }
  - { op: attach, source: D, target: C }
  - { op: merge, survivor: A, absorbed: B }
";

    #[test]
    fn parse_and_replay_yaml() {
        let script: Script = serde_yaml::from_str(CHAIN).unwrap();
        assert_eq!(script.policy, PolicyDef::SameSuccessors);
        assert_eq!(script.ops.len(), 5);
        assert_eq!(
            script.ops[0],
            OpDef::MakeNodes {
                source: "B".into(),
                target: "C".into()
            }
        );

        let graph = script.replay().unwrap();
        let a = graph.node_at_label("A").unwrap();
        let c = graph.node_at_label("C").unwrap();
        assert_eq!(graph.node_at_label("B"), Some(a));
        assert!(graph.has_edge(a, c));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn defaults_apply_to_sparse_scripts() {
        let script: Script = serde_yaml::from_str("ops: []").unwrap();
        assert_eq!(script.version, LATEST_VERSION);
        assert_eq!(script.policy, PolicyDef::Never);
        assert!(script.style.is_none());
    }

    #[test]
    fn failing_op_reports_its_index() {
        let script: Script = serde_yaml::from_str(
            "ops:\n  - { op: make_node, label: A }\n  - { op: create_edge, source: A, target: B }\n",
        )
        .unwrap();
        match script.replay() {
            Err(CliError::Op { index, op, error }) => {
                assert_eq!(index, 1);
                assert_eq!(op, "create_edge");
                assert_eq!(error, GraphError::UnknownLabel { label: "B".into() });
            }
            other => panic!("expected op failure, got {other:?}"),
        }
    }

    #[test]
    fn relate_uses_script_policy() {
        let script: Script = serde_yaml::from_str(
            "
policy: same_successors
ops:
  - { op: make_nodes, source: t1, target: int }
  - { op: make_nodes, source: t2, target: int }
  - { op: make_node, label: f }
  - { op: relate, source: f, target: t1 }
  - { op: relate, source: f, target: t2 }
",
        )
        .unwrap();
        let graph = script.replay().unwrap();
        assert_eq!(graph.node_at_label("t2"), graph.node_at_label("t1"));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn load_json_and_yaml_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("chain.yaml");
        std::fs::write(&yaml, CHAIN).unwrap();
        assert_eq!(load_script(&yaml).unwrap().ops.len(), 5);

        let json = dir.path().join("chain.json");
        std::fs::write(
            &json,
            r#"{"version": 1, "ops": [{"op": "clone_node", "new_label": "B", "old_label": "A"}]}"#,
        )
        .unwrap();
        let script = load_script(&json).unwrap();
        assert!(matches!(script.replay(), Err(CliError::Op { index: 0, .. })));

        let style = dir.path().join("style.yml");
        std::fs::write(&style, "background: white\nfont_size: 12\n").unwrap();
        let style = load_style(&style).unwrap();
        assert_eq!(style.background, "white");
        assert_eq!(style.font_size, 12);
        assert_eq!(style.edge_color, DotStyle::default().edge_color);
    }

    #[test]
    fn rejects_unknown_version_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let future = dir.path().join("future.yaml");
        std::fs::write(&future, "version: 2\nops: []\n").unwrap();
        assert!(matches!(
            load_script(&future),
            Err(CliError::Core(QgError::InvalidArg { .. }))
        ));

        let txt = dir.path().join("script.txt");
        std::fs::write(&txt, "ops: []").unwrap();
        assert!(matches!(load_script(&txt), Err(CliError::Format { .. })));
    }
}
