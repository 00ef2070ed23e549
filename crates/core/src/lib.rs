//! Teammate Graph Core Library
//!
//! This library holds the driver relationship graph: drivers, the teammate
//! relationships between them with their per-constructor season history,
//! and the queries a presentation layer runs against it.
//!
//! - [`resolve_constructor`] picks the constructor that represents a
//!   driver or relationship for a season window
//! - [`compute_visible_drivers`] filters drivers by window and career
//!   race count
//! - [`shortest_path`] finds and annotates the shortest teammate chain
//!   between two visible drivers
//!
//! The graph is immutable after construction and every query is a pure
//! function of its arguments, so a `&Graph` can be shared across threads
//! freely.

pub mod config;
pub mod error;
pub mod graph;
pub mod history;
pub mod path;
pub mod resolver;
pub mod snapshot;
pub mod teammates;
pub mod visibility;
pub mod window;

// Re-export commonly used types
pub use error::{GraphError, Result};
pub use graph::{Driver, Graph, TeammateRelationship};
pub use history::{ConstructorHistory, ConstructorId, ConstructorStint};
pub use path::{longest_shortest_path, shortest_path, Path, PathResult, PathStep};
pub use resolver::resolve_constructor;
pub use visibility::{compute_visible_drivers, VisibleSet};
pub use window::YearWindow;
