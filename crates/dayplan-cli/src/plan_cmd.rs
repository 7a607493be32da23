//! CLI handlers for scheduling commands.
//!
//! Implements:
//! - `dayplan plan`          -- build a schedule from tasks and a time range
//! - `dayplan tasks <tasks>` -- show how a task list is normalized

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde_json::json;

use dayplan_core::{
    DurationSource, Planner, Schedule, ServiceErrorPolicy, Task, classify, parse_tasks,
    schedule_offline,
};

use crate::config::DayplanConfig;

/// Printed when either input is blank. Scheduling is not attempted.
pub const MISSING_INPUT_MESSAGE: &str = "Error: Please provide both tasks and a time range.";

/// Flags for `dayplan plan`.
#[derive(Debug, Default)]
pub struct PlanOptions {
    pub tasks: Option<String>,
    pub range: Option<String>,
    pub offline: bool,
    pub strict_range: bool,
    pub fallback_on_error: bool,
    pub json: bool,
}

/// How a `dayplan plan` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    Scheduled,
    MissingInput,
    Failed,
}

// -----------------------------------------------------------------------
// dayplan plan
// -----------------------------------------------------------------------

/// Run `dayplan plan`, prompting on stdin for any input not given as a flag.
pub async fn run_plan(options: PlanOptions, config: &DayplanConfig) -> Result<PlanOutcome> {
    let (tasks_input, range_input) = {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        collect_inputs(
            options.tasks.as_deref(),
            options.range.as_deref(),
            &mut stdin.lock(),
            &mut stdout,
        )?
    };

    if tasks_input.trim().is_empty() || range_input.trim().is_empty() {
        println!("{MISSING_INPUT_MESSAGE}");
        return Ok(PlanOutcome::MissingInput);
    }

    let mut planner_config = config.planner.clone();
    planner_config.strict_range |= options.strict_range;
    if options.fallback_on_error {
        planner_config.on_service_error = ServiceErrorPolicy::Fallback;
    }

    let result = if options.offline {
        schedule_offline(&tasks_input, &range_input, planner_config.strict_range)
    } else {
        let generator = config.build_generator()?;
        tracing::info!(generator = generator.name(), "scheduling with generation service");
        Planner::new(generator, planner_config)
            .schedule(&tasks_input, &range_input)
            .await
    };

    match result {
        Ok(schedule) => {
            println!("{}", render_schedule(&schedule, options.json)?);
            Ok(PlanOutcome::Scheduled)
        }
        Err(err) => {
            println!("Error: {err}");
            Ok(PlanOutcome::Failed)
        }
    }
}

/// Fill in missing inputs by prompting on `writer` and reading `reader`.
fn collect_inputs(
    tasks: Option<&str>,
    range: Option<&str>,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<(String, String)> {
    let tasks = match tasks {
        Some(t) => t.to_string(),
        None => prompt_line("Tasks (comma-separated): ", reader, writer)?,
    };
    let range = match range {
        Some(r) => r.to_string(),
        None => prompt_line("Available time: ", reader, writer)?,
    };
    Ok((tasks, range))
}

fn prompt_line(label: &str, reader: &mut impl BufRead, writer: &mut impl Write) -> Result<String> {
    write!(writer, "{label}").context("failed to write prompt")?;
    writer.flush().context("failed to flush prompt")?;
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Render a schedule as plain lines or as JSON.
pub fn render_schedule(schedule: &Schedule, as_json: bool) -> Result<String> {
    if !as_json {
        return Ok(schedule.to_string());
    }
    let entries: Vec<_> = schedule
        .entries
        .iter()
        .map(|e| {
            json!({
                "start": e.start,
                "end": e.end,
                "label": e.label,
            })
        })
        .collect();
    let value = json!({
        "source": schedule.source,
        "entries": entries,
        "extra_slots": schedule.extra_slots,
        "lines": schedule.lines(),
    });
    serde_json::to_string_pretty(&value).context("failed to serialize schedule")
}

// -----------------------------------------------------------------------
// dayplan tasks <tasks>
// -----------------------------------------------------------------------

/// Print each normalized task and the total requested time.
pub fn run_tasks(input: &str) -> Result<()> {
    let tasks = parse_tasks(input).context("failed to parse tasks")?;
    for task in &tasks {
        println!("{}", describe_task(task));
    }
    let total: f64 = tasks.iter().map(|t| t.duration_hours).sum();
    println!("total: {total}h");
    Ok(())
}

fn describe_task(task: &Task) -> String {
    let origin = match task.source {
        DurationSource::Explicit => "explicit".to_string(),
        DurationSource::Inferred => match classify(&task.name) {
            Some(class) => format!("inferred, {class}"),
            None => "inferred, default".to_string(),
        },
    };
    format!("{}: {}h ({origin})", task.name, task.duration_hours)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dayplan_core::{ScheduleSource, TimeRange, fallback_schedule};

    use super::*;

    #[test]
    fn flags_skip_prompting() {
        let mut reader = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let (tasks, range) =
            collect_inputs(Some("gym"), Some("8 AM-6 PM"), &mut reader, &mut out).unwrap();
        assert_eq!(tasks, "gym");
        assert_eq!(range, "8 AM-6 PM");
        assert!(out.is_empty());
    }

    #[test]
    fn missing_inputs_are_prompted_in_order() {
        let mut reader = Cursor::new(b"gym: 1h, call mom\n  9 AM - 5 PM  \n".to_vec());
        let mut out = Vec::new();
        let (tasks, range) = collect_inputs(None, None, &mut reader, &mut out).unwrap();
        assert_eq!(tasks, "gym: 1h, call mom");
        assert_eq!(range, "9 AM - 5 PM");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Tasks (comma-separated): Available time: "
        );
    }

    #[test]
    fn closed_stdin_yields_empty_input() {
        let mut reader = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let (tasks, range) = collect_inputs(None, Some("8 AM-6 PM"), &mut reader, &mut out).unwrap();
        assert!(tasks.is_empty());
        assert_eq!(range, "8 AM-6 PM");
    }

    #[test]
    fn renders_plain_lines() {
        let tasks = parse_tasks("gym: 1h, call friend").unwrap();
        let schedule = fallback_schedule(&tasks, TimeRange::new(8, 18)).unwrap();
        assert_eq!(
            render_schedule(&schedule, false).unwrap(),
            "8:00 AM - 9:00 AM: gym\n9:00 AM - 9:30 AM: call friend"
        );
    }

    #[test]
    fn renders_json_with_clock_strings() {
        let tasks = parse_tasks("gym: 1h").unwrap();
        let mut schedule = fallback_schedule(&tasks, TimeRange::new(13, 18)).unwrap();
        schedule.source = ScheduleSource::Generated;
        schedule.extra_slots.push("laundry".to_string());

        let rendered = render_schedule(&schedule, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["source"], "generated");
        assert_eq!(value["entries"][0]["start"], "1:00 PM");
        assert_eq!(value["entries"][0]["end"], "2:00 PM");
        assert_eq!(value["extra_slots"][0], "laundry");
        assert_eq!(value["lines"][1], "Extra slot: laundry");
    }

    #[test]
    fn describes_task_origins() {
        let tasks = parse_tasks("gym: 90m, call friend, laundry").unwrap();
        let described: Vec<String> = tasks.iter().map(describe_task).collect();
        assert_eq!(
            described,
            vec![
                "gym: 1.5h (explicit)",
                "call friend: 0.5h (inferred, short)",
                "laundry: 1h (inferred, default)",
            ]
        );
    }

    #[tokio::test]
    async fn offline_plan_needs_no_service() {
        let config = DayplanConfig {
            service: crate::config::ServiceSection::default(),
            planner: dayplan_core::PlannerConfig::default(),
        };
        let options = PlanOptions {
            tasks: Some("gym: 1h".to_string()),
            range: Some("8 AM-6 PM".to_string()),
            offline: true,
            ..PlanOptions::default()
        };
        assert_eq!(run_plan(options, &config).await.unwrap(), PlanOutcome::Scheduled);
    }

    #[tokio::test]
    async fn blank_flag_reports_missing_input() {
        let config = DayplanConfig {
            service: crate::config::ServiceSection::default(),
            planner: dayplan_core::PlannerConfig::default(),
        };
        let options = PlanOptions {
            tasks: Some("   ".to_string()),
            range: Some("8 AM-6 PM".to_string()),
            ..PlanOptions::default()
        };
        assert_eq!(run_plan(options, &config).await.unwrap(), PlanOutcome::MissingInput);
    }

    #[tokio::test]
    async fn infeasible_plan_is_reported_not_raised() {
        let config = DayplanConfig {
            service: crate::config::ServiceSection::default(),
            planner: dayplan_core::PlannerConfig::default(),
        };
        let options = PlanOptions {
            tasks: Some("project: 5h, project review: 5h".to_string()),
            range: Some("9 AM–5 PM".to_string()),
            offline: true,
            ..PlanOptions::default()
        };
        assert_eq!(run_plan(options, &config).await.unwrap(), PlanOutcome::Failed);
    }
}
