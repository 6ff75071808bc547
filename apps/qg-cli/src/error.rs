use qg_core::QgError;
use qg_graph::GraphError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] QgError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Operation #{index} ({op}) failed: {error}")]
    Op {
        index: usize,
        op: &'static str,
        error: GraphError,
    },

    #[error("Unsupported script format: {path}")]
    Format { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
