//! Duration inference: keyword → effort class → hours.
//!
//! The taxonomy is a priority-ordered table. A task name is lower-cased and
//! tested against each row's keywords in turn; the first row with a keyword
//! contained in the name decides the duration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Duration used when no keyword matches.
pub const DEFAULT_DURATION_HOURS: f64 = 1.0;

/// Coarse effort estimate for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortClass {
    /// Communication and errands.
    Short,
    /// Exercise, reading, planning.
    Medium,
    /// Creation, coding, design.
    Long,
}

impl EffortClass {
    /// Hours allotted to a task of this class.
    pub fn hours(self) -> f64 {
        match self {
            Self::Short => 0.5,
            Self::Medium => 1.0,
            Self::Long => 2.0,
        }
    }
}

impl fmt::Display for EffortClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Medium => write!(f, "medium"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Keyword table in priority order.
const TAXONOMY: &[(EffortClass, &[&str])] = &[
    (
        EffortClass::Short,
        &["call", "email", "shop", "walk", "lunch"],
    ),
    (
        EffortClass::Medium,
        &["gym", "read", "meet", "plan", "study"],
    ),
    (
        EffortClass::Long,
        &["write", "code", "design", "prepare", "project"],
    ),
];

/// Classify a task name, or `None` if no keyword matches.
pub fn classify(name: &str) -> Option<EffortClass> {
    let lowered = name.to_lowercase();
    TAXONOMY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(class, _)| *class)
}

/// Infer a duration in hours for a task name. Never fails.
pub fn infer_duration(name: &str) -> f64 {
    classify(name).map_or(DEFAULT_DURATION_HOURS, EffortClass::hours)
}
