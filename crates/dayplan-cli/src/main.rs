mod config;
mod plan_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use config::{Backend, DayplanConfig};
use plan_cmd::{PlanOptions, PlanOutcome};

#[derive(Parser)]
#[command(name = "dayplan", about = "Time-blocked daily schedules from a task list")]
struct Cli {
    /// Generation service base URL (overrides DAYPLAN_ENDPOINT env var)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Generation backend (overrides DAYPLAN_BACKEND env var)
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a dayplan config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Build a schedule (prompts for any input not given as a flag)
    Plan {
        /// Comma-separated tasks, e.g. "gym: 1h, write report: 2h, call friend"
        #[arg(long)]
        tasks: Option<String>,
        /// Available time, e.g. "8 AM - 6 PM"
        #[arg(long)]
        range: Option<String>,
        /// Skip the generation service and use the sequential fallback
        #[arg(long)]
        offline: bool,
        /// Fail on an unparsable time range instead of using 8 AM - 6 PM
        #[arg(long)]
        strict_range: bool,
        /// Use the fallback schedule when the generation service fails
        #[arg(long)]
        fallback_on_error: bool,
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a task list is normalized
    Tasks {
        /// Comma-separated tasks
        tasks: String,
    },
}

/// Execute the `dayplan init` command: write a config file.
fn cmd_init(backend: Option<Backend>, endpoint: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    if let Some(backend) = backend {
        cfg.service.backend = backend;
    }
    if let Some(url) = endpoint {
        cfg.service.endpoint = url.to_string();
    }

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  service.endpoint = {}", cfg.service.endpoint);
    println!();
    println!("Next: run `dayplan plan` to build a schedule.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli.backend, cli.endpoint.as_deref(), force)?;
        }
        Commands::Plan {
            tasks,
            range,
            offline,
            strict_range,
            fallback_on_error,
            json,
        } => {
            let resolved = DayplanConfig::resolve(cli.backend, cli.endpoint.as_deref())?;
            let options = PlanOptions {
                tasks,
                range,
                offline,
                strict_range,
                fallback_on_error,
                json,
            };
            if plan_cmd::run_plan(options, &resolved).await? == PlanOutcome::Failed {
                std::process::exit(1);
            }
        }
        Commands::Tasks { tasks } => {
            plan_cmd::run_tasks(&tasks)?;
        }
    }

    Ok(())
}
