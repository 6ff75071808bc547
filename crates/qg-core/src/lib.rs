//! qg-core: stable foundation for quograph.
//!
//! Contains:
//! - ids (compact, never-reused node and edge identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;

pub use error::{QgError, QgResult};
pub use ids::{EdgeId, NodeId};
