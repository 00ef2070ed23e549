//! Shortest teammate paths between drivers
//!
//! Searches run over the visible subgraph only: drivers outside the
//! caller's [`VisibleSet`] are filtered out of the traversal with
//! `petgraph::visit::NodeFiltered`, so neither they nor their
//! relationships can appear in a result. Every relationship on a path is
//! labeled with its representative constructor for the caller's window,
//! the same label the relationship carries on screen.
//!
//! All relationships cost the same, so the search is an unweighted
//! shortest-path query. When several shortest paths exist, the one
//! returned is whichever the traversal reaches first; callers must not
//! rely on a particular choice.

use petgraph::algo::{astar, dijkstra};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::NodeFiltered;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::history::ConstructorId;
use crate::resolver::relationship_constructor;
use crate::visibility::VisibleSet;
use crate::window::YearWindow;

/// One element of an annotated path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStep {
    Driver {
        id: String,
        name: String,
    },
    Relationship {
        driver_a: String,
        driver_b: String,
        /// Representative constructor for the active window
        constructor_id: ConstructorId,
    },
}

/// An annotated path `driver, relationship, driver, ..., driver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of relationship hops
    pub fn hops(&self) -> usize {
        (self.steps.len().saturating_sub(1)) / 2
    }

    /// Ids of the drivers on the path, in order
    pub fn driver_ids(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                PathStep::Driver { id, .. } => Some(id.as_str()),
                PathStep::Relationship { .. } => None,
            })
            .collect()
    }

    /// Render the path as `A -> Team -> B`, naming constructors with `ctor_name`
    ///
    /// Constructors the lookup does not know are shown by id.
    pub fn trace<'n, F>(&self, ctor_name: F) -> String
    where
        F: Fn(&ConstructorId) -> Option<&'n str>,
    {
        self.steps
            .iter()
            .map(|step| match step {
                PathStep::Driver { name, .. } => name.clone(),
                PathStep::Relationship { constructor_id, .. } => ctor_name(constructor_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| constructor_id.to_string()),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trace(|_| None))
    }
}

/// Outcome of a path query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathResult {
    Found(Path),
    /// The drivers exist but are not connected in the visible subgraph
    NoPath {
        source_name: String,
        target_name: String,
    },
}

impl PathResult {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NoPath { .. } => None,
        }
    }

    /// Hop count of a found path
    pub fn steps(&self) -> Option<usize> {
        self.path().map(Path::hops)
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathResult::Found(path) => write!(f, "{}", path),
            PathResult::NoPath {
                source_name,
                target_name,
            } => write!(f, "No path from {} to {}", source_name, target_name),
        }
    }
}

/// Find the shortest teammate path from `source_id` to `target_id`
///
/// A driver queried against themselves always yields the zero-hop path,
/// even when that driver is not in `visible`; this is the one result that
/// can name a driver outside the visible set. For distinct drivers, if
/// either endpoint is outside `visible` or the two are disconnected in
/// the visible subgraph, the result is [`PathResult::NoPath`].
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if either id is not in the graph.
pub fn shortest_path(
    graph: &Graph,
    visible: &VisibleSet,
    source_id: &str,
    target_id: &str,
    window: YearWindow,
) -> Result<PathResult> {
    let source = graph.require(source_id)?;
    let target = graph.require(target_id)?;

    if source == target {
        return annotate(graph, &[source], window).map(PathResult::Found);
    }

    if visible.contains(source_id) && visible.contains(target_id) {
        let inner = graph.inner();
        let filtered =
            NodeFiltered::from_fn(inner, |n: NodeIndex| visible.contains(&inner[n].id));
        if let Some((_, nodes)) = astar(&filtered, source, |n| n == target, |_| 1u32, |_| 0u32)
        {
            let path = annotate(graph, &nodes, window)?;
            tracing::debug!(
                source = source_id,
                target = target_id,
                hops = path.hops(),
                "Found shortest path"
            );
            return Ok(PathResult::Found(path));
        }
    }

    tracing::debug!(source = source_id, target = target_id, "No path in visible subgraph");
    Ok(PathResult::NoPath {
        source_name: graph.driver_at(source).display_name.clone(),
        target_name: graph.driver_at(target).display_name.clone(),
    })
}

/// The visible pair whose shortest path is longest, with that path
///
/// Every connected component of the visible subgraph is searched, not
/// only the largest one, so on a disconnected graph the pair can come
/// from a smaller component that happens to have the longer path.
///
/// Returns `None` when nothing is visible. When no two visible drivers
/// are connected the result is a zero-hop path.
pub fn longest_shortest_path(
    graph: &Graph,
    visible: &VisibleSet,
    window: YearWindow,
) -> Result<Option<Path>> {
    let inner = graph.inner();
    let filtered = NodeFiltered::from_fn(inner, |n: NodeIndex| visible.contains(&inner[n].id));

    let mut starts: Vec<NodeIndex> = visible.iter().filter_map(|id| graph.index_of(id)).collect();
    starts.sort();

    let mut best: Option<(u32, NodeIndex, NodeIndex)> = None;
    for &start in &starts {
        let mut distances: Vec<(NodeIndex, u32)> =
            dijkstra(&filtered, start, None, |_| 1u32).into_iter().collect();
        distances.sort();
        for (end, dist) in distances {
            if best.map_or(true, |(best_dist, _, _)| dist > best_dist) {
                best = Some((dist, start, end));
            }
        }
    }

    let Some((_, start, end)) = best else {
        return Ok(None);
    };
    let source_id = graph.driver_at(start).id.clone();
    let target_id = graph.driver_at(end).id.clone();
    Ok(shortest_path(graph, visible, &source_id, &target_id, window)?
        .path()
        .cloned())
}

/// Interleave drivers with their window-resolved relationship labels
fn annotate(graph: &Graph, nodes: &[NodeIndex], window: YearWindow) -> Result<Path> {
    let mut steps = Vec::with_capacity(nodes.len() * 2);
    for (i, &idx) in nodes.iter().enumerate() {
        if i > 0 {
            let prev = nodes[i - 1];
            let relationship = graph.relationship_between(prev, idx).ok_or_else(|| {
                GraphError::MalformedGraph(format!(
                    "path step {} -> {} has no relationship",
                    graph.driver_at(prev).id,
                    graph.driver_at(idx).id
                ))
            })?;
            steps.push(PathStep::Relationship {
                driver_a: relationship.driver_a.clone(),
                driver_b: relationship.driver_b.clone(),
                constructor_id: relationship_constructor(relationship, window),
            });
        }
        let driver = graph.driver_at(idx);
        steps.push(PathStep::Driver {
            id: driver.id.clone(),
            name: driver.display_name.clone(),
        });
    }
    Ok(Path { steps })
}
