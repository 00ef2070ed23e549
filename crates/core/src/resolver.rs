//! Representative constructor resolution
//!
//! Picks the one constructor that best describes a driver or relationship
//! for a given season window. Results depend on the window, so they are
//! computed on every call and never stored on the graph.

use crate::graph::{Driver, TeammateRelationship};
use crate::history::{ConstructorHistory, ConstructorId};
use crate::window::YearWindow;

/// Resolve the representative constructor of `history` within `window`
///
/// Each stint scores the number of its seasons inside the window; the
/// highest score wins. Ties go to the chronologically later stint, which
/// also covers the case where nothing falls in the window: the most
/// recent stint of the whole history is returned. An empty history
/// resolves to [`ConstructorId::UNKNOWN`].
///
/// # Example
///
/// ```
/// use teammate_graph_core::{
///     resolve_constructor, ConstructorHistory, ConstructorStint, YearWindow,
/// };
///
/// let history = ConstructorHistory::new(vec![
///     ConstructorStint::new("team_x", [2018, 2019]),
///     ConstructorStint::new("team_y", [2021]),
/// ]);
/// let ctor = resolve_constructor(&history, YearWindow::new(2018, 2020));
/// assert_eq!(ctor.as_str(), "team_x");
/// ```
pub fn resolve_constructor(history: &ConstructorHistory, window: YearWindow) -> ConstructorId {
    let mut best: Option<(usize, &ConstructorId)> = None;

    // Walk oldest to newest; `>=` lets a later stint take a tied score.
    for stint in history {
        let score = stint.years_in(&window);
        if best.map_or(true, |(best_score, _)| score >= best_score) {
            best = Some((score, &stint.constructor_id));
        }
    }

    best.map(|(_, id)| id.clone())
        .unwrap_or_else(ConstructorId::unknown)
}

/// Representative constructor of a driver, used for node coloring
pub fn driver_constructor(driver: &Driver, window: YearWindow) -> ConstructorId {
    resolve_constructor(&driver.history, window)
}

/// Representative constructor of a relationship, used for edge labels
pub fn relationship_constructor(
    relationship: &TeammateRelationship,
    window: YearWindow,
) -> ConstructorId {
    resolve_constructor(&relationship.history, window)
}
