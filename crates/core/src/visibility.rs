//! Window and activity-threshold visibility
//!
//! Visibility is driver-driven: a driver is visible when they meet the
//! career race threshold and raced at least one season inside the
//! window; a relationship is visible when both of its drivers are.
//! Whether the pair's shared seasons fall in the window is irrelevant
//! here, labels are resolved separately.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::graph::{Driver, Graph, TeammateRelationship};
use crate::window::YearWindow;

/// Set of driver ids eligible for display and traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibleSet {
    ids: HashSet<String>,
}

impl VisibleSet {
    /// Whether `id` is visible
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn is_subset(&self, other: &VisibleSet) -> bool {
        self.ids.is_subset(&other.ids)
    }

    /// Remove a driver, e.g. to route a path around them
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Whether both endpoints of `relationship` are visible
    pub fn admits(&self, relationship: &TeammateRelationship) -> bool {
        self.contains(&relationship.driver_a) && self.contains(&relationship.driver_b)
    }
}

impl<S: Into<String>> FromIterator<S> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether a single driver passes the window and race-count filters
pub fn is_driver_visible(driver: &Driver, window: YearWindow, min_race_count: u32) -> bool {
    driver.race_count >= min_race_count && driver.history.active_in(&window)
}

/// Compute the visible drivers for a window and activity threshold
///
/// An inverted window contains no seasons, so it yields an empty set
/// rather than an error.
pub fn compute_visible_drivers(
    graph: &Graph,
    window: YearWindow,
    min_race_count: u32,
) -> VisibleSet {
    let visible: VisibleSet = graph
        .all_drivers()
        .filter(|driver| is_driver_visible(driver, window, min_race_count))
        .map(|driver| driver.id.clone())
        .collect();

    tracing::debug!(
        min_year = window.min,
        max_year = window.max,
        min_race_count,
        visible = visible.len(),
        total = graph.driver_count(),
        "Computed visible drivers"
    );
    visible
}

/// Relationships whose endpoints are both in `visible`, in insertion order
pub fn visible_relationships<'g>(
    graph: &'g Graph,
    visible: &'g VisibleSet,
) -> impl Iterator<Item = &'g TeammateRelationship> + 'g {
    graph
        .all_relationships()
        .filter(move |relationship| visible.admits(relationship))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{driver, teammates};
    use crate::history::ConstructorStint;

    fn graph() -> Graph {
        Graph::build(
            vec![
                driver("veteran", 200, vec![ConstructorStint::new("x", [2010, 2011])]),
                driver("rookie", 9, vec![ConstructorStint::new("x", [2011])]),
                driver("current", 40, vec![ConstructorStint::new("y", [2023, 2024])]),
            ],
            vec![teammates("veteran", "rookie", vec![ConstructorStint::new("x", [2011])])],
        )
        .unwrap()
    }

    #[test]
    fn test_window_selects_active_drivers() {
        let visible = compute_visible_drivers(&graph(), YearWindow::new(2010, 2012), 0);
        assert!(visible.contains("veteran"));
        assert!(visible.contains("rookie"));
        assert!(!visible.contains("current"));
    }

    #[test]
    fn test_race_threshold_applies_regardless_of_window() {
        let visible = compute_visible_drivers(&graph(), YearWindow::new(2011, 2011), 10);
        assert!(visible.contains("veteran"));
        assert!(!visible.contains("rookie"));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let visible = compute_visible_drivers(&graph(), YearWindow::new(2024, 2010), 0);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_relationship_needs_both_endpoints() {
        let g = graph();
        let both = compute_visible_drivers(&g, YearWindow::new(2010, 2011), 0);
        assert_eq!(visible_relationships(&g, &both).count(), 1);

        let only_veteran = compute_visible_drivers(&g, YearWindow::new(2010, 2011), 10);
        assert_eq!(visible_relationships(&g, &only_veteran).count(), 0);
    }

    #[test]
    fn test_relationship_visible_outside_shared_years() {
        // Shared season 2011 is outside the window, both drivers are still active in it.
        let g = Graph::build(
            vec![
                driver(
                    "a",
                    10,
                    vec![ConstructorStint::new("x", [2011]), ConstructorStint::new("y", [2015])],
                ),
                driver(
                    "b",
                    10,
                    vec![ConstructorStint::new("x", [2011]), ConstructorStint::new("z", [2015])],
                ),
            ],
            vec![teammates("a", "b", vec![ConstructorStint::new("x", [2011])])],
        )
        .unwrap();
        let visible = compute_visible_drivers(&g, YearWindow::new(2015, 2015), 0);
        assert_eq!(visible_relationships(&g, &visible).count(), 1);
    }
}
