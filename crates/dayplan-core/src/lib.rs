//! Task scheduling and plan-validation engine.
//!
//! Turns a free-text task list and availability window into a time-blocked
//! daily schedule. A generation service proposes the schedule; its output is
//! validated against the structured task list and replaced by a deterministic
//! fallback when unusable.

mod clock;

pub mod engine;
pub mod error;
pub mod generate;
pub mod schedule;
pub mod task;
pub mod taxonomy;
pub mod time_range;

pub use clock::format_clock;
pub use engine::{
    NormalizedInput, Planner, PlannerConfig, ServiceErrorPolicy, normalize_input,
    schedule_offline,
};
pub use error::{InputError, ScheduleError};
pub use generate::{
    CommandGenerator, GenerationError, GenerationRequest, GenerationResponse, GenerationSettings,
    Generator, HttpGenerator, HttpGeneratorConfig, build_prompt,
};
pub use schedule::{Schedule, ScheduleEntry, ScheduleSource, fallback_schedule, reconcile};
pub use task::{DurationSource, Task, TaskParseError, parse_tasks};
pub use taxonomy::{EffortClass, classify, infer_duration};
pub use time_range::TimeRange;
