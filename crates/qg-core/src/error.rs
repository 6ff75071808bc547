use thiserror::Error;

pub type QgResult<T> = Result<T, QgError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QgError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
