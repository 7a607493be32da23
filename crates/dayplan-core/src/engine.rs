//! Scheduling engine: one request from raw input to a reconciled schedule.
//!
//! ```text
//! START -> NORMALIZE_INPUT -> {PARSE_FAIL | GENERATE}
//! GENERATE -> {SERVICE_ERROR | VALIDATE}
//! VALIDATE -> {NO_MATCH -> FALLBACK -> {INFEASIBLE | DONE}
//!             | MATCH -> AUGMENT -> DONE}
//! ```
//!
//! The [`Planner`] holds no mutable state, so concurrent requests on a shared
//! planner are independent. The generation call is the only await point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::{InputError, ScheduleError};
use crate::generate::{GenerationSettings, Generator, build_prompt};
use crate::schedule::{Schedule, fallback_schedule, reconcile};
use crate::task::{Task, parse_tasks};
use crate::time_range::TimeRange;

/// What to do when the generation call itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorPolicy {
    /// Surface [`ScheduleError::Generation`].
    #[default]
    Fail,
    /// Log the failure and return the fallback schedule.
    Fallback,
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub on_service_error: ServiceErrorPolicy,
    /// Reject unparsable time ranges instead of using the default window.
    pub strict_range: bool,
    pub generation: GenerationSettings,
}

/// Structured model derived from the two raw inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub tasks: Vec<Task>,
    pub range: TimeRange,
    /// Trimmed range text as the user wrote it, for the prompt.
    pub range_text: String,
}

/// Validate and normalize the raw inputs.
pub fn normalize_input(
    tasks_input: &str,
    range_input: &str,
    strict_range: bool,
) -> Result<NormalizedInput, InputError> {
    let tasks_input = tasks_input.trim();
    let range_text = range_input.trim();
    if tasks_input.is_empty() || range_text.is_empty() {
        return Err(InputError::MissingInput);
    }

    let tasks = parse_tasks(tasks_input)?;
    let range = if strict_range {
        TimeRange::try_parse(range_text).ok_or_else(|| InputError::TimeRange {
            text: range_text.to_string(),
        })?
    } else {
        TimeRange::parse(range_text)
    };

    Ok(NormalizedInput {
        tasks,
        range,
        range_text: range_text.to_string(),
    })
}

/// Schedule without contacting any generation service.
pub fn schedule_offline(
    tasks_input: &str,
    range_input: &str,
    strict_range: bool,
) -> Result<Schedule, ScheduleError> {
    let input = normalize_input(tasks_input, range_input, strict_range)?;
    fallback_schedule(&input.tasks, input.range)
}

/// Drives a generation service and reconciles its output.
pub struct Planner {
    generator: Arc<dyn Generator>,
    config: PlannerConfig,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("generator", &self.generator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Planner {
    pub fn new(generator: Arc<dyn Generator>, config: PlannerConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run one scheduling request end to end.
    pub async fn schedule(
        &self,
        tasks_input: &str,
        range_input: &str,
    ) -> Result<Schedule, ScheduleError> {
        let span = info_span!(
            "schedule",
            request_id = %Uuid::new_v4(),
            generator = self.generator.name()
        );
        self.run(tasks_input, range_input).instrument(span).await
    }

    async fn run(&self, tasks_input: &str, range_input: &str) -> Result<Schedule, ScheduleError> {
        let input = normalize_input(tasks_input, range_input, self.config.strict_range)?;
        info!(
            tasks = input.tasks.len(),
            start_hour = input.range.start_hour,
            end_hour = input.range.end_hour,
            "normalized input"
        );

        let prompt = build_prompt(&input.tasks, &input.range_text);
        let request = self.config.generation.request(prompt);

        let response = match self.generator.generate(&request).await {
            Ok(response) => response,
            Err(err) => match self.config.on_service_error {
                ServiceErrorPolicy::Fail => {
                    warn!(error = %err, "generation service failed");
                    return Err(err.into());
                }
                ServiceErrorPolicy::Fallback => {
                    warn!(error = %err, "generation service failed, using fallback schedule");
                    return fallback_schedule(&input.tasks, input.range);
                }
            },
        };

        reconcile(&response.text, &input.tasks, input.range)
    }
}
