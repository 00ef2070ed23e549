//! Error types for graph construction and queries

use thiserror::Error;

/// Errors raised by the relationship graph engine
///
/// A missing path between two drivers is not an error; see
/// [`crate::path::PathResult::NoPath`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The snapshot violates a structural invariant (self-loop, duplicate
    /// edge, dangling endpoint, inconsistent shared tenure, empty history)
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    /// A query referenced a driver id that is not in the graph
    #[error("Driver not found: {0}")]
    NotFound(String),
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, GraphError>;
