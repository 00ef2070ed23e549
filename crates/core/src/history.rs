//! Per-constructor season history shared by drivers and relationships
//!
//! A history is an ordered list of stints, one per constructor, oldest
//! first. For a driver the years are the seasons they raced for that
//! constructor; for a relationship they are the seasons both drivers
//! were there at the same time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::window::YearWindow;

/// Opaque constructor (team) identifier
///
/// The engine never interprets it beyond equality; names and colors
/// live with the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructorId(pub String);

impl ConstructorId {
    /// Sentinel returned when there is no history to resolve
    pub const UNKNOWN: &'static str = "0";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConstructorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConstructorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Seasons spent at a single constructor
///
/// A driver who left and later rejoined keeps one stint with a gap in
/// `years`; stints are never split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorStint {
    pub constructor_id: ConstructorId,
    pub years: BTreeSet<i32>,
}

impl ConstructorStint {
    pub fn new(
        constructor_id: impl Into<ConstructorId>,
        years: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            constructor_id: constructor_id.into(),
            years: years.into_iter().collect(),
        }
    }

    /// Earliest season, `None` for an empty stint
    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Number of seasons inside `window`
    pub fn years_in(&self, window: &YearWindow) -> usize {
        if window.is_inverted() {
            return 0;
        }
        self.years.range(window.min..=window.max).count()
    }
}

/// Chronologically ordered constructor stints
///
/// Serializes as a plain list; deserializing goes through
/// [`ConstructorHistory::new`], so the ordering and one-stint-per-constructor
/// rules hold however a history is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ConstructorStint>", into = "Vec<ConstructorStint>")]
pub struct ConstructorHistory {
    stints: Vec<ConstructorStint>,
}

impl ConstructorHistory {
    /// Build a normalized history
    ///
    /// Stints naming the same constructor are merged (union of years),
    /// then ordered by earliest season. The sort is stable, so stints
    /// starting in the same season keep their input order.
    pub fn new(stints: impl IntoIterator<Item = ConstructorStint>) -> Self {
        let mut merged: Vec<ConstructorStint> = Vec::new();
        for stint in stints {
            match merged
                .iter_mut()
                .find(|existing| existing.constructor_id == stint.constructor_id)
            {
                Some(existing) => existing.years.extend(stint.years),
                None => merged.push(stint),
            }
        }
        merged.sort_by_key(|stint| stint.first_year());
        Self { stints: merged }
    }

    pub fn stints(&self) -> &[ConstructorStint] {
        &self.stints
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConstructorStint> {
        self.stints.iter()
    }

    /// Stints most recent first
    pub fn recent_first(&self) -> impl Iterator<Item = &ConstructorStint> {
        self.stints.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.stints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stints.is_empty()
    }

    /// The chronologically last stint
    pub fn latest(&self) -> Option<&ConstructorStint> {
        self.stints.last()
    }

    pub fn stint_for(&self, constructor_id: &ConstructorId) -> Option<&ConstructorStint> {
        self.stints
            .iter()
            .find(|stint| &stint.constructor_id == constructor_id)
    }

    /// Every season across all stints
    pub fn all_years(&self) -> BTreeSet<i32> {
        self.stints
            .iter()
            .flat_map(|stint| stint.years.iter().copied())
            .collect()
    }

    /// Whether any season of any stint falls inside `window`
    pub fn active_in(&self, window: &YearWindow) -> bool {
        self.stints.iter().any(|stint| stint.years_in(window) > 0)
    }
}

impl From<Vec<ConstructorStint>> for ConstructorHistory {
    fn from(stints: Vec<ConstructorStint>) -> Self {
        Self::new(stints)
    }
}

impl From<ConstructorHistory> for Vec<ConstructorStint> {
    fn from(history: ConstructorHistory) -> Self {
        history.stints
    }
}

impl<'a> IntoIterator for &'a ConstructorHistory {
    type Item = &'a ConstructorStint;
    type IntoIter = std::slice::Iter<'a, ConstructorStint>;

    fn into_iter(self) -> Self::IntoIter {
        self.stints.iter()
    }
}

/// Renders as `ctor[2018, 2019], other[2021]`
impl fmt::Display for ConstructorHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stint) in self.stints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let years: Vec<String> = stint.years.iter().map(|y| y.to_string()).collect();
            write!(f, "{}[{}]", stint.constructor_id, years.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_by_earliest_year() {
        let history = ConstructorHistory::new(vec![
            ConstructorStint::new("mercedes", [2021, 2022]),
            ConstructorStint::new("williams", [2019, 2020]),
        ]);
        let ids: Vec<&str> = history.iter().map(|s| s.constructor_id.as_str()).collect();
        assert_eq!(ids, vec!["williams", "mercedes"]);
    }

    #[test]
    fn test_new_merges_repeated_constructor() {
        let history = ConstructorHistory::new(vec![
            ConstructorStint::new("renault", [2003, 2004]),
            ConstructorStint::new("mclaren", [2007]),
            ConstructorStint::new("renault", [2008, 2009]),
        ]);
        assert_eq!(history.len(), 2);
        let renault = history.stint_for(&"renault".into()).unwrap();
        let years: Vec<i32> = renault.years.iter().copied().collect();
        assert_eq!(years, vec![2003, 2004, 2008, 2009]);
        assert_eq!(history.latest().unwrap().constructor_id.as_str(), "mclaren");
    }

    #[test]
    fn test_deserialize_normalizes_history() {
        let history: ConstructorHistory = serde_json::from_str(
            r#"[
                { "constructor_id": "y", "years": [2021] },
                { "constructor_id": "x", "years": [2018] },
                { "constructor_id": "y", "years": [2023] }
            ]"#,
        )
        .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.to_string(), "x[2018], y[2021, 2023]");

        let json = serde_json::to_string(&history).unwrap();
        let again: ConstructorHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(again, history);
    }

    #[test]
    fn test_years_in_window() {
        let stint = ConstructorStint::new("ferrari", [2014, 2015, 2016, 2019]);
        assert_eq!(stint.years_in(&YearWindow::new(2015, 2018)), 2);
        assert_eq!(stint.years_in(&YearWindow::new(2020, 2024)), 0);
        assert_eq!(stint.years_in(&YearWindow::new(2019, 2014)), 0);
    }

    #[test]
    fn test_active_in() {
        let history = ConstructorHistory::new(vec![ConstructorStint::new("sauber", [2010, 2012])]);
        assert!(history.active_in(&YearWindow::new(2012, 2013)));
        assert!(!history.active_in(&YearWindow::new(2011, 2011)));
    }

    #[test]
    fn test_display_lists_each_stint() {
        let history = ConstructorHistory::new(vec![
            ConstructorStint::new("x", [2018, 2019]),
            ConstructorStint::new("y", [2021]),
        ]);
        assert_eq!(history.to_string(), "x[2018, 2019], y[2021]");
    }

    #[test]
    fn test_recent_first_reverses() {
        let history = ConstructorHistory::new(vec![
            ConstructorStint::new("x", [2018]),
            ConstructorStint::new("y", [2021]),
        ]);
        let ids: Vec<&str> = history.recent_first().map(|s| s.constructor_id.as_str()).collect();
        assert_eq!(ids, vec!["y", "x"]);
    }
}
