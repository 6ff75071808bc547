use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use qg_graph::{GraphError, validate_graph};

mod error;
mod script;

use error::CliResult;
use script::{load_script, load_style};

#[derive(Parser)]
#[command(name = "qg-cli")]
#[command(about = "quograph CLI - build, collapse and export relation graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and export the resulting graph in dot format
    Run {
        /// Path to the script file (YAML or JSON)
        script: PathBuf,
        /// Output dot file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Style file overriding the script's dot style
        #[arg(long)]
        style: Option<PathBuf>,
    },
    /// Replay a script and check the graph invariants
    Check {
        /// Path to the script file (YAML or JSON)
        script: PathBuf,
    },
    /// Replay a script and list its nodes and edges
    Print {
        /// Path to the script file (YAML or JSON)
        script: PathBuf,
    },
    /// Show which node a label resolves to after replay
    Resolve {
        /// Path to the script file (YAML or JSON)
        script: PathBuf,
        /// Label to look up
        label: String,
    },
}

fn main() -> CliResult<()> {
    // stdout is reserved for dot output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            output,
            style,
        } => cmd_run(&script, output.as_deref(), style.as_deref()),
        Commands::Check { script } => cmd_check(&script),
        Commands::Print { script } => cmd_print(&script),
        Commands::Resolve { script, label } => cmd_resolve(&script, &label),
    }
}

fn cmd_run(script_path: &Path, output: Option<&Path>, style_path: Option<&Path>) -> CliResult<()> {
    let script = load_script(script_path)?;
    let graph = script.replay()?;

    let style = match style_path {
        Some(path) => load_style(path)?,
        None => script.style.clone().unwrap_or_default(),
    };

    match output {
        Some(path) => {
            graph.create_dot_file_with(&style, path)?;
            println!(
                "✓ Wrote {} nodes, {} edges to {}",
                graph.node_count(),
                graph.edge_count(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            graph.write_dot_with(&style, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn cmd_check(script_path: &Path) -> CliResult<()> {
    let script = load_script(script_path)?;
    let graph = script.replay()?;
    validate_graph(&graph)?;

    println!("✓ Graph is consistent");
    println!("  Ops: {}", script.ops.len());
    println!("  Nodes: {}", graph.node_count());
    println!("  Edges: {}", graph.edge_count());
    println!("  Labels: {}", graph.label_count());
    Ok(())
}

fn cmd_print(script_path: &Path) -> CliResult<()> {
    let graph = load_script(script_path)?.replay()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    graph.print_graph(&mut out)?;
    out.flush()?;
    Ok(())
}

fn cmd_resolve(script_path: &Path, label: &str) -> CliResult<()> {
    let mut graph = load_script(script_path)?.replay()?;
    let Some(id) = graph.canonicalize(label) else {
        return Err(GraphError::UnknownLabel {
            label: label.to_string(),
        }
        .into());
    };

    println!("{label} -> node {id}");
    println!("  Label: {}", graph.label(id).unwrap_or_default());
    println!("  Aliases: {}", graph.aliases(id).join(", "));
    if let Some(node) = graph.node(id) {
        println!("  Out edges: {}", node.out_degree());
        println!("  In edges: {}", node.in_degree());
    }
    Ok(())
}
