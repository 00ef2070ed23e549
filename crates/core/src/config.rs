//! Display defaults for hosts embedding the engine
//!
//! The engine itself takes its window and threshold as plain arguments;
//! these defaults are what a host starts from before the user moves a
//! slider, and the timeline bounds a window is clamped to.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::window::YearWindow;

pub const DEFAULT_MIN_DISPLAY_YEAR: i32 = 2024;
pub const DEFAULT_MAX_DISPLAY_YEAR: i32 = 2025;
pub const DEFAULT_MIN_RACE_COUNT: u32 = 5;
pub const TIMELINE_MIN_YEAR: i32 = 1970;
pub const TIMELINE_MAX_YEAR: i32 = 2025;

/// Starting window, activity threshold and timeline bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayDefaults {
    pub min_year: i32,
    pub max_year: i32,
    pub min_race_count: u32,
    pub timeline_min_year: i32,
    pub timeline_max_year: i32,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_DISPLAY_YEAR,
            max_year: DEFAULT_MAX_DISPLAY_YEAR,
            min_race_count: DEFAULT_MIN_RACE_COUNT,
            timeline_min_year: TIMELINE_MIN_YEAR,
            timeline_max_year: TIMELINE_MAX_YEAR,
        }
    }
}

impl DisplayDefaults {
    /// Load defaults from a JSON file; missing fields keep their default
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read display defaults {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid display defaults {}", path.display()))
    }

    /// The default window, clamped to the timeline
    pub fn window(&self) -> YearWindow {
        self.clamp(YearWindow::new(self.min_year, self.max_year))
    }

    /// Order `window`'s bounds and clamp them to the timeline
    pub fn clamp(&self, window: YearWindow) -> YearWindow {
        let window = window.ordered();
        let lo = self.timeline_min_year.min(self.timeline_max_year);
        let hi = self.timeline_min_year.max(self.timeline_max_year);
        YearWindow::new(window.min.clamp(lo, hi), window.max.clamp(lo, hi))
    }
}
