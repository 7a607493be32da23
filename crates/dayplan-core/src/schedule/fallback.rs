//! Deterministic fallback scheduler.
//!
//! Lays tasks end to end from the start of the window, in input order. The
//! result is either a complete contiguous schedule or an error; no partial
//! schedule is ever returned.

use chrono::{Duration, NaiveTime, Timelike};
use tracing::debug;

use crate::error::ScheduleError;
use crate::task::{Task, TaskParseError};
use crate::time_range::TimeRange;

use super::{Schedule, ScheduleEntry, ScheduleSource};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Build a sequential schedule for `tasks` inside `range`.
///
/// Tasks with a non-finite or non-positive duration are rejected as input
/// errors. Fails with [`ScheduleError::Infeasible`] when the summed durations exceed
/// the window, and with [`ScheduleError::WindowOverflow`] when the last task
/// ends past the window's end hour on the wall clock.
pub fn fallback_schedule(tasks: &[Task], range: TimeRange) -> Result<Schedule, ScheduleError> {
    if let Some(task) = tasks
        .iter()
        .find(|t| !t.duration_hours.is_finite() || t.duration_hours <= 0.0)
    {
        return Err(TaskParseError::NonPositiveDuration {
            task: task.name.clone(),
            value: format!("{}h", task.duration_hours),
        }
        .into());
    }

    let available = f64::from(range.total_hours());
    let requested: f64 = tasks.iter().map(|t| t.duration_hours).sum();
    if requested > available {
        return Err(ScheduleError::Infeasible {
            requested,
            available,
        });
    }

    let mut cursor = range.start_time();
    let mut entries = Vec::with_capacity(tasks.len());
    for task in tasks {
        let end = advance(cursor, task.duration_hours);
        entries.push(ScheduleEntry::new(cursor, end, task.name.clone()));
        cursor = end;
    }

    let last_end_hour = f64::from(cursor.hour()) + f64::from(cursor.minute()) / 60.0;
    if last_end_hour > f64::from(range.end_hour) {
        return Err(ScheduleError::WindowOverflow { range });
    }

    debug!(
        tasks = tasks.len(),
        requested_hours = requested,
        available_hours = available,
        "built fallback schedule"
    );

    Ok(Schedule {
        source: ScheduleSource::Fallback,
        entries,
        extra_slots: Vec::new(),
    })
}

/// Add `hours` to a wall-clock time, wrapping past midnight.
fn advance(time: NaiveTime, hours: f64) -> NaiveTime {
    let micros = (hours * MICROS_PER_HOUR).round() as i64;
    time.overflowing_add_signed(Duration::microseconds(micros)).0
}
