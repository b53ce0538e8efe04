use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod config;
mod logging;
mod models;
mod registry;
mod report;
mod selectors;
mod snapshot;

use crate::config::Config;
use crate::registry::SelectorRegistry;
use crate::selectors::{bulk_management, grades};

#[derive(Parser)]
#[command(name = "gradebook-views")]
#[command(about = "Display and export views derived from gradebook snapshots", long_about = None)]
struct Cli {
    /// Snapshot JSON to derive from (defaults to $GRADEBOOK_STATE)
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the export header row as CSV
    Headings {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write bulk upload history summaries as CSV
    History {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show bulk operation status and control states
    Status,
    /// Evaluate one named selector and print it as JSON
    Get { name: String },
    /// List every declared selector name
    Selectors,
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn open_output(out: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let registry = SelectorRegistry::new(config.guard_policy);
    tracing::debug!(policy = ?registry.policy(), "selector registry ready");

    if let Commands::Selectors = cli.command {
        for name in registry.keys() {
            println!("{name}");
        }
        return Ok(());
    }

    let state_path = config.resolve_state_path(cli.state)?;
    let state = snapshot::load_state(&state_path)?;
    tracing::info!(path = %state_path.display(), "snapshot loaded");

    match cli.command {
        Commands::Headings { out } => {
            let headings = grades::headings(&state);
            report::write_headings_csv(open_output(out.as_deref())?, &headings)?;
            if let Some(path) = out {
                println!("Headings written to {}.", path.display());
            }
        }
        Commands::History { out } => {
            let entries = bulk_management::bulk_management_history_entries(&state);
            report::write_history_csv(open_output(out.as_deref())?, &entries)?;
            if let Some(path) = out {
                println!("{} history entries written to {}.", entries.len(), path.display());
            }
        }
        Commands::Status => {
            println!(
                "Status: {}",
                bulk_management::bulk_operation_status(&state)
            );
            let import_error = bulk_management::bulk_import_error(&state);
            if !import_error.is_empty() {
                println!("{import_error}");
            }
            for control in bulk_management::control_states(&state) {
                println!(
                    "- {}: {}",
                    control.label,
                    if control.disabled { "disabled" } else { "enabled" }
                );
            }
        }
        Commands::Get { name } => {
            let value = registry.derive(&name, &state)?;
            let rendered = serde_json::to_string_pretty(&value)
                .context("failed to render selector value")?;
            println!("{rendered}");
        }
        Commands::Report { out } => {
            let report = report::build_report(&state);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Selectors => {}
    }

    Ok(())
}
