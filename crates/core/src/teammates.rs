//! Season-by-season teammate breakdown for a single driver

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::graph::Graph;
use crate::history::ConstructorId;

/// Teammates a driver had in each season at one constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammatesAtConstructor {
    pub constructor_id: ConstructorId,
    /// `(season, teammate ids)` in season order; ids are sorted
    pub seasons: Vec<(i32, Vec<String>)>,
}

/// Break a driver's career down by constructor and season
///
/// Constructors follow the driver's own chronological history, and every
/// season the driver raced there is listed, with an empty teammate list
/// if no relationship covers it.
pub fn teammates_by_year(graph: &Graph, driver_id: &str) -> Result<Vec<TeammatesAtConstructor>> {
    let driver = graph.get_driver(driver_id)?;
    let relationships = graph.relationships_of(driver_id)?;

    let breakdown = driver
        .history
        .iter()
        .map(|stint| {
            let mut seasons: BTreeMap<i32, Vec<String>> =
                stint.years.iter().map(|&year| (year, Vec::new())).collect();

            for relationship in &relationships {
                let Some(shared) = relationship.history.stint_for(&stint.constructor_id) else {
                    continue;
                };
                let Some(teammate) = relationship.other(driver_id) else {
                    continue;
                };
                for year in &shared.years {
                    if let Some(ids) = seasons.get_mut(year) {
                        ids.push(teammate.to_string());
                    }
                }
            }

            TeammatesAtConstructor {
                constructor_id: stint.constructor_id.clone(),
                seasons: seasons
                    .into_iter()
                    .map(|(year, mut ids)| {
                        ids.sort();
                        (year, ids)
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(breakdown)
}
