//! Reconciliation of generated schedule text against the task list.
//!
//! Generated text is untrusted. Only lines shaped exactly like
//! `8:00 AM - 9:00 AM: Label` are kept. If none are, the deterministic
//! fallback schedule is used instead. Otherwise every task missing from the
//! kept labels gets an `Extra slot` stand-in so the result covers all tasks.
//! Accepted lines are returned as written; their clock values are matched
//! structurally and not re-checked for validity or feasibility.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::ScheduleError;
use crate::task::Task;
use crate::time_range::TimeRange;

use super::{Schedule, ScheduleEntry, ScheduleSource, fallback_schedule};

static SCHEDULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2}\s(?:AM|PM))\s*-\s*(\d{1,2}:\d{2}\s(?:AM|PM)):(.*)$")
        .expect("schedule line pattern is valid")
});

/// Reconcile raw generated text into a schedule covering every task.
pub fn reconcile(raw: &str, tasks: &[Task], range: TimeRange) -> Result<Schedule, ScheduleError> {
    let entries = extract_entries(raw);
    if entries.is_empty() {
        info!("generated text has no schedule lines, using fallback schedule");
        return fallback_schedule(tasks, range);
    }

    let labels: Vec<String> = entries.iter().map(|e| e.label.to_lowercase()).collect();
    let extra_slots: Vec<String> = tasks
        .iter()
        .filter(|task| {
            let name = task.name.to_lowercase();
            !labels.iter().any(|label| label.contains(&name))
        })
        .map(|task| task.name.clone())
        .collect();

    debug!(
        entries = entries.len(),
        extra_slots = extra_slots.len(),
        "accepted generated schedule"
    );

    Ok(Schedule {
        source: ScheduleSource::Generated,
        entries,
        extra_slots,
    })
}

/// Extract every well-formed schedule line from `raw`, in emitted order.
///
/// A line must start with the pattern (no leading whitespace). Everything
/// else is ignored. Kept lines are stored verbatim, minus trailing
/// whitespace, so `13:00 PM` or irregular spacing survive unchanged.
pub fn extract_entries(raw: &str) -> Vec<ScheduleEntry> {
    raw.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ScheduleEntry> {
    let line = line.trim_end();
    let caps = SCHEDULE_LINE.captures(line)?;
    Some(ScheduleEntry::from_line(
        line,
        &caps[1],
        &caps[2],
        caps[3].trim(),
    ))
}
