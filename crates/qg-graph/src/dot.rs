//! Textual export for graph-visualization tools.
//!
//! Output is deterministic: nodes in insertion order, then each node's
//! outgoing edges in insertion order, using current display labels.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::graph::Graph;

/// Styling for the dot preamble.
///
/// The defaults reproduce the dark theme the compiler's debug dumps have
/// always used.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DotStyle {
    pub rank_sep: f64,
    pub background: String,
    pub node_shape: String,
    pub font_size: u32,
    pub font_name: String,
    pub font_color: String,
    pub node_color: String,
    pub fill_color: String,
    pub arrow_size: f64,
    pub edge_color: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            rank_sep: 0.3,
            background: "#292929".into(),
            node_shape: "box".into(),
            font_size: 10,
            font_name: "Courier-Bold".into(),
            font_color: "grey4".into(),
            node_color: "#00C389".into(),
            fill_color: "#00C389".into(),
            arrow_size: 0.4,
            edge_color: "firebrick1".into(),
        }
    }
}

impl DotStyle {
    fn write_preamble(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "digraph {{")?;
        writeln!(out, "ordering=out;")?;
        writeln!(out, "ranksep={};", self.rank_sep)?;
        writeln!(out, "bgcolor=\"{}\";", escape(&self.background))?;
        writeln!(
            out,
            "node [shape={}, fixedsize=false, fontsize={}, fontname=\"{}\", fontcolor=\"{}\", \
             width=.15, height=.15, color=\"{}\", fillcolor=\"{}\", style=\"filled, solid, solid\"];",
            self.node_shape,
            self.font_size,
            escape(&self.font_name),
            escape(&self.font_color),
            escape(&self.node_color),
            escape(&self.fill_color),
        )?;
        writeln!(
            out,
            "edge [arrowsize={}, color=\"{}\", style=\"solid\"];",
            self.arrow_size,
            escape(&self.edge_color),
        )
    }
}

impl Graph {
    /// Write the whole graph in dot format with the default style.
    pub fn write_dot(&self, out: &mut impl Write) -> io::Result<()> {
        self.write_dot_with(&DotStyle::default(), out)
    }

    /// Write the whole graph in dot format.
    pub fn write_dot_with(&self, style: &DotStyle, out: &mut impl Write) -> io::Result<()> {
        style.write_preamble(out)?;
        self.write_edge_lines(out)?;
        writeln!(out, "}}")
    }

    /// Render the graph in dot format with the default style.
    pub fn to_dot(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_dot(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the graph to a dot file, replacing any existing file.
    pub fn create_dot_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.create_dot_file_with(&DotStyle::default(), path)
    }

    pub fn create_dot_file_with(&self, style: &DotStyle, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_dot_with(style, &mut out)?;
        out.flush()?;
        debug!(path = %path.display(), edges = self.edge_count(), "wrote dot file");
        Ok(())
    }

    /// List the display label of every node, one per line.
    pub fn print_all_nodes(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "All Nodes:")?;
        for &id in self.nodes() {
            if let Some(label) = self.label(id) {
                writeln!(out, "{label}")?;
            }
        }
        Ok(())
    }

    /// List every node, then every edge in export order.
    pub fn print_graph(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_all_nodes(out)?;
        writeln!(out)?;
        self.write_edge_lines(out)
    }

    fn write_edge_lines(&self, out: &mut impl Write) -> io::Result<()> {
        for (_, edge) in self.edges() {
            let (Some(source), Some(target)) = (self.label(edge.source()), self.label(edge.target()))
            else {
                continue;
            };
            writeln!(out, "\"{}\" -> \"{}\"", escape(source), escape(target))?;
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
