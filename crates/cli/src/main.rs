//! taskrank CLI - rank tasks and pick what to do today.

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskrank_core::{tasks_from_json, Date, Mode, Priority, ScoredTask, Task, DATE_FORMAT};
use taskrank_execution::{Budget, Prioritizer};
use taskrank_server::{AppState, ServerConfig};
use taskrank_storage::JsonTaskStore;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::logging::{init_logging, LogLevel};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(about = "Rank tasks and pick what to do today", long_about = None, version)]
struct Cli {
    /// Log level (overrides TASKRANK_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every task in a file, highest first
    Analyze {
        /// JSON task list ("-" for stdin)
        #[arg(long)]
        file: PathBuf,
        /// fastest_wins, high_impact, deadline_driven or smart_balance
        #[arg(long)]
        mode: Option<String>,
        /// Reference date (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Pick today's tasks from a file
    Suggest {
        /// JSON task list ("-" for stdin)
        #[arg(long)]
        file: PathBuf,
        /// fastest_wins, high_impact, deadline_driven or smart_balance
        #[arg(long)]
        mode: Option<String>,
        /// Hour budget
        #[arg(long)]
        hours: Option<f64>,
        /// Reference date (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
        /// JSON task store file
        #[arg(long)]
        store: Option<PathBuf>,
        /// Default hour budget for suggest
        #[arg(long)]
        budget_hours: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze { file, mode, today, json } => {
            let mode = Mode::from_query(mode.as_deref())?;
            let tasks = read_tasks(&file).await?;
            let ranked = Prioritizer::new(parse_today(today.as_deref())?).rank(&tasks, mode)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print_ranked(mode, &ranked);
            }
        }
        Commands::Suggest { file, mode, hours, today, json } => {
            let mode = Mode::from_query(mode.as_deref())?;
            let budget = Budget::or_default(hours)?;
            let tasks = read_tasks(&file).await?;
            let suggestion = Prioritizer::new(parse_today(today.as_deref())?)
                .with_budget(budget)
                .suggest(&tasks, mode)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestion.tasks)?);
            } else {
                println!(
                    "Today ({} tasks, {}h of {}h) - {}",
                    suggestion.tasks.len(),
                    suggestion.total_hours,
                    suggestion.budget_hours,
                    mode.label()
                );
                for (i, task) in suggestion.tasks.iter().enumerate() {
                    println!(
                        "  {:>2}. {:>6.2}  {}  {} ({}h)  {}",
                        i + 1,
                        task.score,
                        task.id(),
                        task.task.title,
                        task.task.estimated_hours,
                        task.explanation,
                    );
                }
            }
        }
        Commands::Serve { host, port, store, budget_hours } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(store) = store {
                config.store_path = store;
            }
            if let Some(hours) = budget_hours {
                config.default_budget_hours = Budget::new(hours)?.hours();
            }

            let store = JsonTaskStore::new(&config.store_path)
                .await
                .with_context(|| format!("opening task store {}", config.store_path.display()))?;
            info!(store = %config.store_path.display(), "using JSON task store");

            let listener = tokio::net::TcpListener::bind(config.addr())
                .await
                .with_context(|| format!("binding {}", config.addr()))?;
            let state = AppState::new(Arc::new(store), config.budget());
            taskrank_server::serve(listener, state).await?;
        }
    }

    Ok(())
}

async fn read_tasks(file: &Path) -> Result<Vec<Task>> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("reading {}", file.display()))?
    };

    let value: serde_json::Value = serde_json::from_str(&raw).context("task file is not valid JSON")?;
    Ok(tasks_from_json(&value)?)
}

fn parse_today(raw: Option<&str>) -> Result<Date> {
    match raw {
        Some(s) => Date::parse_from_str(s, DATE_FORMAT)
            .with_context(|| format!("invalid --today '{s}' (expected YYYY-MM-DD)")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn print_ranked(mode: Mode, ranked: &[ScoredTask]) {
    println!("Tasks ({}) - {}", ranked.len(), mode.label());
    for (i, task) in ranked.iter().enumerate() {
        let blocks = match task.blocks {
            0 => String::new(),
            1 => "  [blocks 1 task]".to_string(),
            n => format!("  [blocks {n} tasks]"),
        };
        println!(
            "  {:>2}. {:>6.2}  {:<6}  {}  {}  {}{}",
            i + 1,
            task.score,
            format_priority(task),
            task.id(),
            task.task.title,
            task.explanation,
            blocks,
        );
    }
}

fn format_priority(task: &ScoredTask) -> &'static str {
    match task.priority {
        Priority::High => "HIGH",
        Priority::Medium => "MEDIUM",
        Priority::Low => "LOW",
    }
}
