//! Schedule model, deterministic fallback scheduling, and reconciliation of
//! generated text against the task list.

pub mod fallback;
pub mod reconcile;

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::format_clock;

pub use fallback::fallback_schedule;
pub use reconcile::{extract_entries, reconcile};

/// Prefix of the stand-in line appended for a task the generated plan missed.
pub const EXTRA_SLOT_PREFIX: &str = "Extra slot: ";

/// One time block.
///
/// `start` and `end` are clock strings such as `9:00 AM`. Entries accepted
/// from generated text keep the clock text and the whole line exactly as
/// emitted; the scheduler does not re-validate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start: String,
    pub end: String,
    pub label: String,
    /// Rendered output line.
    pub line: String,
}

impl ScheduleEntry {
    /// Build an entry from wall-clock times, rendered as `H:MM AM - H:MM PM: label`.
    pub fn new(start: NaiveTime, end: NaiveTime, label: impl Into<String>) -> Self {
        let start = format_clock(start);
        let end = format_clock(end);
        let label = label.into();
        let line = format!("{start} - {end}: {label}");
        Self {
            start,
            end,
            label,
            line,
        }
    }

    /// Entry for a generated line, kept verbatim.
    pub(crate) fn from_line(
        line: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            label: label.into(),
            line: line.into(),
        }
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Which path produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// Accepted from the generation service (possibly augmented).
    Generated,
    /// Computed by the deterministic fallback scheduler.
    Fallback,
}

/// A fully reconciled schedule covering every task.
///
/// `extra_slots` names tasks that had no matching entry; they render after
/// the entries as `Extra slot: <name>` lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub source: ScheduleSource,
    pub entries: Vec<ScheduleEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_slots: Vec<String>,
}

impl Schedule {
    /// Rendered output lines in order.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(ToString::to_string)
            .chain(
                self.extra_slots
                    .iter()
                    .map(|name| format!("{EXTRA_SLOT_PREFIX}{name}")),
            )
            .collect()
    }

    /// Whether `task_name` appears, case-insensitively, in some output line.
    pub fn covers(&self, task_name: &str) -> bool {
        let needle = task_name.to_lowercase();
        self.lines()
            .iter()
            .any(|line| line.to_lowercase().contains(&needle))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn entry_renders_twelve_hour_line() {
        let entry = ScheduleEntry::new(t(11, 0), t(11, 30), "call friend");
        assert_eq!(entry.to_string(), "11:00 AM - 11:30 AM: call friend");
        assert_eq!(entry.start, "11:00 AM");
        assert_eq!(entry.end, "11:30 AM");
    }

    #[test]
    fn extra_slots_render_after_entries() {
        let schedule = Schedule {
            source: ScheduleSource::Generated,
            entries: vec![ScheduleEntry::new(t(8, 0), t(9, 0), "Gym")],
            extra_slots: vec!["call mom".to_string()],
        };
        assert_eq!(
            schedule.to_string(),
            "8:00 AM - 9:00 AM: Gym\nExtra slot: call mom"
        );
        assert!(schedule.covers("gym"));
        assert!(schedule.covers("Call Mom"));
        assert!(!schedule.covers("laundry"));
    }
}
