//! Graph store for drivers and teammate relationships
//!
//! Uses an undirected `petgraph::StableGraph` so node and edge indices
//! follow insertion order, which gives `all_drivers()` and
//! `all_relationships()` their stable ordering. The graph is built once
//! from a snapshot and is read-only afterwards; every derived value
//! (representative constructor, visibility) is computed per query.

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{GraphError, Result};
use crate::history::{ConstructorHistory, ConstructorStint};

/// A driver (node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique, stable identifier
    pub id: String,
    /// Presentation name, e.g. "Lewis Hamilton"
    pub display_name: String,
    pub surname: String,
    /// Career race count, compared against the activity threshold
    pub race_count: u32,
    /// Seasons per constructor, oldest stint first
    pub history: ConstructorHistory,
}

/// A teammate relationship (edge) between two distinct drivers
///
/// The endpoints are stored normalized so that `driver_a < driver_b`.
/// `history` holds only the seasons both drivers spent together at each
/// constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeammateRelationship {
    pub driver_a: String,
    pub driver_b: String,
    pub history: ConstructorHistory,
}

impl TeammateRelationship {
    /// Create a relationship, ordering the endpoints
    pub fn new(x: impl Into<String>, y: impl Into<String>, history: ConstructorHistory) -> Self {
        let (x, y) = (x.into(), y.into());
        let (driver_a, driver_b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            driver_a,
            driver_b,
            history,
        }
    }

    pub fn involves(&self, driver_id: &str) -> bool {
        self.driver_a == driver_id || self.driver_b == driver_id
    }

    /// Shared stints, most recent first
    pub fn recent_first(&self) -> impl Iterator<Item = &ConstructorStint> {
        self.history.recent_first()
    }

    /// The endpoint opposite `driver_id`, if `driver_id` is an endpoint
    pub fn other(&self, driver_id: &str) -> Option<&str> {
        if self.driver_a == driver_id {
            Some(&self.driver_b)
        } else if self.driver_b == driver_id {
            Some(&self.driver_a)
        } else {
            None
        }
    }
}

/// The driver relationship graph
#[derive(Debug)]
pub struct Graph {
    /// The underlying stable graph (private to enforce read-only access)
    inner: StableUnGraph<Driver, TeammateRelationship>,
    /// Driver id to node index for O(1) lookups
    node_id_map: HashMap<String, NodeIndex>,
}

impl Graph {
    /// Build and validate a graph
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedGraph`] if:
    /// - two drivers share an id
    /// - a driver has an empty history, or any stint has no seasons
    /// - a relationship is a self-loop, references an unknown driver, or
    ///   duplicates an existing pair
    /// - a relationship claims a shared season that is missing from either
    ///   driver's own stint at that constructor
    pub fn build(
        drivers: impl IntoIterator<Item = Driver>,
        relationships: impl IntoIterator<Item = TeammateRelationship>,
    ) -> Result<Self> {
        let mut graph = Self {
            inner: StableUnGraph::default(),
            node_id_map: HashMap::new(),
        };

        for driver in drivers {
            graph.insert_driver(driver)?;
        }
        for relationship in relationships {
            graph.insert_relationship(relationship)?;
        }

        tracing::info!(
            drivers = graph.driver_count(),
            relationships = graph.relationship_count(),
            "Built driver relationship graph"
        );
        Ok(graph)
    }

    fn insert_driver(&mut self, driver: Driver) -> Result<()> {
        if self.node_id_map.contains_key(&driver.id) {
            return Err(GraphError::MalformedGraph(format!(
                "duplicate driver id '{}'",
                driver.id
            )));
        }
        if driver.history.is_empty() {
            return Err(GraphError::MalformedGraph(format!(
                "driver '{}' has no constructor history",
                driver.id
            )));
        }
        if let Some(stint) = driver.history.iter().find(|s| s.years.is_empty()) {
            return Err(GraphError::MalformedGraph(format!(
                "driver '{}' has no seasons at constructor '{}'",
                driver.id, stint.constructor_id
            )));
        }

        let id = driver.id.clone();
        let idx = self.inner.add_node(driver);
        self.node_id_map.insert(id, idx);
        Ok(())
    }

    fn insert_relationship(&mut self, relationship: TeammateRelationship) -> Result<()> {
        let pair = format!("{}-{}", relationship.driver_a, relationship.driver_b);
        if relationship.driver_a == relationship.driver_b {
            return Err(GraphError::MalformedGraph(format!(
                "self-loop on driver '{}'",
                relationship.driver_a
            )));
        }

        let a = self.endpoint(&relationship.driver_a, &pair)?;
        let b = self.endpoint(&relationship.driver_b, &pair)?;
        if self.inner.find_edge(a, b).is_some() {
            return Err(GraphError::MalformedGraph(format!("duplicate relationship {}", pair)));
        }

        for stint in &relationship.history {
            if stint.years.is_empty() {
                return Err(GraphError::MalformedGraph(format!(
                    "relationship {} has no seasons at constructor '{}'",
                    pair, stint.constructor_id
                )));
            }
            for idx in [a, b] {
                let driver = &self.inner[idx];
                let covered = driver
                    .history
                    .stint_for(&stint.constructor_id)
                    .is_some_and(|own| stint.years.is_subset(&own.years));
                if !covered {
                    return Err(GraphError::MalformedGraph(format!(
                        "relationship {} claims seasons at '{}' not raced there by driver '{}'",
                        pair, stint.constructor_id, driver.id
                    )));
                }
            }
        }

        self.inner.add_edge(a, b, relationship);
        Ok(())
    }

    fn endpoint(&self, driver_id: &str, pair: &str) -> Result<NodeIndex> {
        self.node_id_map.get(driver_id).copied().ok_or_else(|| {
            GraphError::MalformedGraph(format!(
                "relationship {} references unknown driver '{}'",
                pair, driver_id
            ))
        })
    }

    /// Look up a driver by id
    pub fn get_driver(&self, id: &str) -> Result<&Driver> {
        self.index_of(id)
            .map(|idx| &self.inner[idx])
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_id_map.contains_key(id)
    }

    /// Ids of every driver sharing a relationship with `id`
    pub fn neighbors(&self, id: &str) -> Result<BTreeSet<&str>> {
        let idx = self.require(id)?;
        Ok(self
            .inner
            .neighbors(idx)
            .map(|n| self.inner[n].id.as_str())
            .collect())
    }

    /// Number of teammates `id` has across the whole graph
    pub fn degree(&self, id: &str) -> Result<usize> {
        let idx = self.require(id)?;
        Ok(self.inner.edges(idx).count())
    }

    /// The relationship between two drivers, in either order
    pub fn relationship(&self, x: &str, y: &str) -> Option<&TeammateRelationship> {
        let a = self.index_of(x)?;
        let b = self.index_of(y)?;
        self.inner.find_edge(a, b).map(|e| &self.inner[e])
    }

    /// Relationships incident on `id`
    pub fn relationships_of(&self, id: &str) -> Result<Vec<&TeammateRelationship>> {
        let idx = self.require(id)?;
        let mut edges: Vec<_> = self.inner.edges(idx).map(|e| (e.id(), e.weight())).collect();
        edges.sort_by_key(|(edge_idx, _)| *edge_idx);
        Ok(edges.into_iter().map(|(_, rel)| rel).collect())
    }

    /// Every driver, in insertion order
    pub fn all_drivers(&self) -> impl Iterator<Item = &Driver> {
        self.inner.node_weights()
    }

    /// Every relationship, in insertion order
    pub fn all_relationships(&self) -> impl Iterator<Item = &TeammateRelationship> {
        self.inner.edge_weights()
    }

    pub fn driver_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_id_map.get(id).copied()
    }

    pub(crate) fn require(&self, id: &str) -> Result<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub(crate) fn inner(&self) -> &StableUnGraph<Driver, TeammateRelationship> {
        &self.inner
    }

    pub(crate) fn driver_at(&self, idx: NodeIndex) -> &Driver {
        &self.inner[idx]
    }

    pub(crate) fn relationship_between(
        &self,
        a: NodeIndex,
        b: NodeIndex,
    ) -> Option<&TeammateRelationship> {
        self.inner.find_edge(a, b).map(|e| &self.inner[e])
    }
}
