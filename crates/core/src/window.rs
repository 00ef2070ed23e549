//! Inclusive season windows used to filter and label the graph

use serde::{Deserialize, Serialize};

/// A caller-chosen inclusive year range `[min, max]`
///
/// An inverted window (`min > max`) is legal and contains no years.
/// The engine never swaps the bounds itself; callers that want the
/// forgiving behavior use [`YearWindow::ordered`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearWindow {
    /// First season in the window (inclusive)
    pub min: i32,
    /// Last season in the window (inclusive)
    pub max: i32,
}

impl YearWindow {
    /// Create a window without reordering the bounds
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A window containing every representable season
    pub fn unbounded() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    /// Whether `year` falls inside the window
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// The same range with its bounds swapped if they were inverted
    pub fn ordered(self) -> Self {
        if self.is_inverted() {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }

    /// Whether every year of `other` is also in `self`
    ///
    /// An inverted `other` is empty and therefore covered by anything.
    pub fn covers(&self, other: &YearWindow) -> bool {
        other.is_inverted() || (self.min <= other.min && other.max <= self.max)
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
