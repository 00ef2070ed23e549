//! Graph snapshot ingest
//!
//! The data endpoint serves a JSON document with `nodes` and `edges`
//! arrays. Elements may arrive bare or wrapped in the `{ "data": {...} }`
//! envelope used by browser graph libraries; both are accepted.
//!
//! # Example
//!
//! ```
//! use teammate_graph_core::snapshot;
//!
//! # fn main() -> Result<(), anyhow::Error> {
//! let graph = snapshot::parse_graph(r#"{
//!     "nodes": [
//!         { "data": { "id": "1", "forename": "Lewis", "surname": "Hamilton", "raceCount": 356,
//!                     "yearsByCtor": [{ "ctorId": "131", "years": [2014, 2013] }] } },
//!         { "data": { "id": "3", "forename": "Nico", "surname": "Rosberg", "raceCount": 206,
//!                     "yearsByCtor": [{ "ctorId": "131", "years": [2013, 2014] }] } }
//!     ],
//!     "edges": [
//!         { "data": { "source": "1", "target": "3",
//!                     "yearsByCtor": [{ "ctorId": "131", "years": [2013, 2014] }] } }
//!     ]
//! }"#)?;
//! assert_eq!(graph.driver_count(), 2);
//! assert_eq!(graph.get_driver("1")?.display_name, "Lewis Hamilton");
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::graph::{Driver, Graph, TeammateRelationship};
use crate::history::{ConstructorHistory, ConstructorStint};

/// Raw snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Element<NodeRecord>>,
    #[serde(default)]
    pub edges: Vec<Element<EdgeRecord>>,
}

/// A node or edge, with or without the `data` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Element<T> {
    pub fn into_inner(self) -> T {
        match self {
            Element::Wrapped { data } => data,
            Element::Bare(inner) => inner,
        }
    }
}

/// Driver as it appears in the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default)]
    pub race_count: u32,
    #[serde(default)]
    pub years_by_ctor: Vec<YearsByCtor>,
}

/// Relationship as it appears in the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    #[serde(deserialize_with = "id_string")]
    pub source: String,
    #[serde(deserialize_with = "id_string")]
    pub target: String,
    #[serde(default)]
    pub years_by_ctor: Vec<YearsByCtor>,
}

/// Seasons at one constructor; `years` need not be sorted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearsByCtor {
    #[serde(deserialize_with = "id_string")]
    pub ctor_id: String,
    /// Constructor display name, ignored by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctor: Option<String>,
    pub years: Vec<i32>,
}

/// Ids are strings on the wire but older snapshots emit bare numbers
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

fn history_of(entity: &str, records: Vec<YearsByCtor>) -> ConstructorHistory {
    let input_len = records.len();
    let history = ConstructorHistory::new(
        records
            .into_iter()
            .map(|record| ConstructorStint::new(record.ctor_id, record.years)),
    );
    if history.len() < input_len {
        tracing::warn!(
            entity,
            merged = input_len - history.len(),
            "Merged repeated constructor entries"
        );
    }
    history
}

fn display_name(record: &NodeRecord) -> String {
    if let Some(name) = record.name.as_deref().filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }
    let full = [record.forename.as_deref(), record.surname.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if full.trim().is_empty() {
        record.id.clone()
    } else {
        full.trim().to_string()
    }
}

impl NodeRecord {
    fn into_driver(self) -> Driver {
        let display_name = display_name(&self);
        let history = history_of(&self.id, self.years_by_ctor);
        Driver {
            id: self.id,
            display_name,
            surname: self.surname.unwrap_or_default(),
            race_count: self.race_count,
            history,
        }
    }
}

impl EdgeRecord {
    fn into_relationship(self) -> TeammateRelationship {
        let label = format!("{}-{}", self.source, self.target);
        let history = history_of(&label, self.years_by_ctor);
        TeammateRelationship::new(self.source, self.target, history)
    }
}

impl Snapshot {
    /// Normalize and validate the snapshot into a [`Graph`]
    pub fn into_graph(self) -> Result<Graph> {
        Graph::build(
            self.nodes
                .into_iter()
                .map(|node| node.into_inner().into_driver()),
            self.edges
                .into_iter()
                .map(|edge| edge.into_inner().into_relationship()),
        )
    }
}

fn to_records(history: &ConstructorHistory) -> Vec<YearsByCtor> {
    history
        .iter()
        .map(|stint| YearsByCtor {
            ctor_id: stint.constructor_id.to_string(),
            ctor: None,
            years: stint.years.iter().copied().collect(),
        })
        .collect()
}

/// Export a graph back to snapshot form (bare elements, normalized years)
impl From<&Graph> for Snapshot {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph
                .all_drivers()
                .map(|driver| {
                    Element::Bare(NodeRecord {
                        id: driver.id.clone(),
                        name: Some(driver.display_name.clone()),
                        surname: Some(driver.surname.clone()),
                        race_count: driver.race_count,
                        years_by_ctor: to_records(&driver.history),
                        ..Default::default()
                    })
                })
                .collect(),
            edges: graph
                .all_relationships()
                .map(|relationship| {
                    Element::Bare(EdgeRecord {
                        source: relationship.driver_a.clone(),
                        target: relationship.driver_b.clone(),
                        years_by_ctor: to_records(&relationship.history),
                    })
                })
                .collect(),
        }
    }
}

/// Parse a JSON snapshot and build the graph
pub fn parse_graph(json: &str) -> anyhow::Result<Graph> {
    let snapshot: Snapshot = serde_json::from_str(json).context("Failed to parse graph snapshot")?;
    Ok(snapshot.into_graph()?)
}

/// Read a JSON snapshot from disk and build the graph
pub fn load_graph(path: &Path) -> anyhow::Result<Graph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph snapshot {}", path.display()))?;
    parse_graph(&json).with_context(|| format!("Invalid graph snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn test_accepts_bare_and_wrapped_elements() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    { "id": "1", "name": "Max Verstappen", "raceCount": 200,
                      "yearsByCtor": [
                        { "ctorId": "9", "ctor": "Red Bull", "years": [2016, 2017] }
                      ] },
                    { "data": { "id": 2, "forename": "Daniel", "surname": "Ricciardo",
                      "raceCount": 250,
                      "yearsByCtor": [{ "ctorId": 9, "years": [2017, 2014, 2016, 2015] }] } }
                ],
                "edges": [
                    { "data": { "source": "2", "target": "1",
                      "yearsByCtor": [{ "ctorId": "9", "years": [2017, 2016] }] } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.driver_count(), 2);
        assert_eq!(graph.get_driver("1").unwrap().display_name, "Max Verstappen");
        let daniel = graph.get_driver("2").unwrap();
        assert_eq!(daniel.display_name, "Daniel Ricciardo");
        assert_eq!(daniel.surname, "Ricciardo");
        let years: Vec<i32> = daniel.history.all_years().into_iter().collect();
        assert_eq!(years, vec![2014, 2015, 2016, 2017]);

        let rel = graph.relationship("1", "2").unwrap();
        assert_eq!(rel.driver_a, "1");
        assert_eq!(rel.driver_b, "2");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let record = NodeRecord {
            id: "77".into(),
            ..Default::default()
        };
        assert_eq!(display_name(&record), "77");
    }

    #[test]
    fn test_repeated_constructor_entries_are_merged() {
        let graph = parse_graph(
            r#"{ "nodes": [ { "id": "a", "raceCount": 1, "yearsByCtor": [
                    { "ctorId": "r", "years": [2003] },
                    { "ctorId": "m", "years": [2007] },
                    { "ctorId": "r", "years": [2008] } ] } ], "edges": [] }"#,
        )
        .unwrap();
        let history = &graph.get_driver("a").unwrap().history;
        assert_eq!(history.len(), 2);
        assert_eq!(history.to_string(), "r[2003, 2008], m[2007]");
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{ "nodes": [ { "id": "a", "yearsByCtor": [{ "ctorId": "x", "years": [2000] }] } ],
                 "edges": [ { "source": "a", "target": "b", "yearsByCtor": [] } ] }"#,
        )
        .unwrap();
        assert!(matches!(snapshot.into_graph(), Err(GraphError::MalformedGraph(_))));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_graph("{ not json").is_err());
    }

    #[test]
    fn test_export_reproduces_years() {
        let json = r#"{ "nodes": [
                { "id": "a", "raceCount": 3,
                  "yearsByCtor": [{ "ctorId": "x", "years": [2002, 2001] }] },
                { "id": "b", "raceCount": 3,
                  "yearsByCtor": [{ "ctorId": "x", "years": [2001] }] } ],
              "edges": [ { "source": "b", "target": "a",
                  "yearsByCtor": [{ "ctorId": "x", "years": [2001] }] } ] }"#;
        let graph = parse_graph(json).unwrap();
        let exported = Snapshot::from(&graph);
        let rebuilt = exported.clone().into_graph().unwrap();

        assert_eq!(exported.nodes.len(), 2);
        for driver in graph.all_drivers() {
            assert_eq!(rebuilt.get_driver(&driver.id).unwrap().history, driver.history);
        }
        assert_eq!(rebuilt.relationship_count(), 1);
    }
}
