//! Task normalization: comma-separated descriptors into [`Task`] records.
//!
//! Each segment is either a bare name (`call friend`) or a name and a
//! duration separated by the first colon (`gym: 1h`, `write report: 90m`).
//! Durations without an `h` or `m` suffix are ignored and inferred from the
//! name through [`crate::taxonomy`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::taxonomy;

/// Where a task's duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// Given in the input with an `h` or `m` suffix.
    Explicit,
    /// Derived from the keyword taxonomy.
    Inferred,
}

/// A single task with a resolved duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Trimmed, non-empty task name.
    pub name: String,
    /// Positive duration in hours.
    pub duration_hours: f64,
    /// Whether the duration was explicit or inferred.
    pub source: DurationSource,
}

impl Task {
    /// Build a task whose duration is inferred from its name.
    pub fn inferred(name: impl Into<String>) -> Self {
        let name = name.into();
        let duration_hours = taxonomy::infer_duration(&name);
        Self {
            name,
            duration_hours,
            source: DurationSource::Inferred,
        }
    }

    /// Build a task with an explicit duration.
    ///
    /// Fails unless `duration_hours` is finite and positive.
    pub fn explicit(name: impl Into<String>, duration_hours: f64) -> Result<Self, TaskParseError> {
        let name = name.into();
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err(TaskParseError::NonPositiveDuration {
                task: name,
                value: format!("{duration_hours}h"),
            });
        }
        Ok(Self {
            name,
            duration_hours,
            source: DurationSource::Explicit,
        })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}h)", self.name, self.duration_hours)
    }
}

/// Errors produced while normalizing task input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskParseError {
    #[error("invalid duration {value:?} for task {task:?}")]
    InvalidDuration { task: String, value: String },

    #[error("duration {value:?} for task {task:?} must be a positive number")]
    NonPositiveDuration { task: String, value: String },

    #[error("task segment {segment:?} has no name before the colon")]
    EmptyName { segment: String },

    #[error("no tasks found in input")]
    NoTasks,
}

/// Parse a comma-separated task list, preserving input order.
pub fn parse_tasks(input: &str) -> Result<Vec<Task>, TaskParseError> {
    let tasks = input
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect::<Result<Vec<_>, _>>()?;

    if tasks.is_empty() {
        return Err(TaskParseError::NoTasks);
    }
    Ok(tasks)
}

/// Parse one trimmed, non-empty segment.
fn parse_segment(segment: &str) -> Result<Task, TaskParseError> {
    let Some((name, duration)) = segment.split_once(':') else {
        return Ok(Task::inferred(segment));
    };

    let name = name.trim();
    let duration = duration.trim();
    if name.is_empty() {
        return Err(TaskParseError::EmptyName {
            segment: segment.to_string(),
        });
    }

    let hours = if let Some(value) = duration.strip_suffix('h') {
        parse_amount(name, duration, value)?
    } else if let Some(value) = duration.strip_suffix('m') {
        parse_amount(name, duration, value)? / 60.0
    } else {
        return Ok(Task::inferred(name));
    };

    Task::explicit(name, hours).map_err(|_| TaskParseError::NonPositiveDuration {
        task: name.to_string(),
        value: duration.to_string(),
    })
}

fn parse_amount(task: &str, raw: &str, value: &str) -> Result<f64, TaskParseError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| TaskParseError::InvalidDuration {
            task: task.to_string(),
            value: raw.to_string(),
        })
}
