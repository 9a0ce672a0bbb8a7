//! Level definitions

use serde::{Deserialize, Serialize};

/// A level: how many bodies to spawn and what the player is asked to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub object_count: usize,
    pub objective: String,
    /// Seconds. Declarative only; nothing ends a level on time.
    pub time_limit: u32,
}

impl Level {
    pub fn new(object_count: usize, objective: &str, time_limit: u32) -> Self {
        Self {
            object_count,
            objective: objective.to_string(),
            time_limit,
        }
    }
}

/// Built-in level table
pub fn default_levels() -> Vec<Level> {
    vec![
        Level::new(5, "Merge all objects", 60),
        Level::new(10, "Avoid obstacles and merge", 60),
    ]
}

/// Look up a 1-based level number. Numbers past the table reuse the last entry.
pub fn level_for(levels: &[Level], number: u32) -> Option<&Level> {
    let idx = (number.max(1) as usize - 1).min(levels.len().checked_sub(1)?);
    levels.get(idx)
}
