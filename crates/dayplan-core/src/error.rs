//! Error types for a scheduling request.

use thiserror::Error;

use crate::generate::GenerationError;
use crate::task::TaskParseError;
use crate::time_range::TimeRange;

/// Problems with the caller's input. Scheduling is not attempted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("please provide both tasks and a time range")]
    MissingInput,

    #[error(transparent)]
    Task(#[from] TaskParseError),

    #[error("could not parse time range {text:?} (expected something like \"8 AM - 6 PM\")")]
    TimeRange { text: String },
}

/// Terminal outcome of a failed scheduling request.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid input: {0}")]
    InputValidation(#[from] InputError),

    #[error("generation service failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("total task duration ({requested}h) exceeds available time ({available}h)")]
    Infeasible { requested: f64, available: f64 },

    #[error("schedule exceeds available time range ({range})")]
    WindowOverflow { range: TimeRange },
}

impl From<TaskParseError> for ScheduleError {
    fn from(err: TaskParseError) -> Self {
        Self::InputValidation(InputError::Task(err))
    }
}
