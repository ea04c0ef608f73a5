//! `networth` binary entry point.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use networth_cli::{Settings, commands};
use networth_core::SystemClock;
use networth_ledger::{AssetRecord, SnapshotLog};

#[derive(Parser)]
#[command(name = "networth")]
#[command(about = "Net worth totals, snapshots and end-of-service accruals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an end-of-service benefit
    Eosb {
        /// Monthly base salary in major units
        #[arg(long)]
        salary: f64,
        /// First day of service (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of service; defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Cap the benefit at this many months of base pay
        #[arg(long)]
        cap_months: Option<u32>,
    },

    /// Total assets, liabilities and net worth
    Totals {
        /// JSON array of asset records
        #[arg(long)]
        assets: PathBuf,
    },

    /// Subtotals per category
    Breakdown {
        /// JSON array of asset records
        #[arg(long)]
        assets: PathBuf,
    },

    /// Record a net worth snapshot
    Snapshot {
        /// JSON array of asset records
        #[arg(long)]
        assets: PathBuf,
        /// Snapshot history to append to (created if missing)
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    networth_observability::init();
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Eosb {
            salary,
            start,
            end,
            cap_months,
        } => {
            let policy = settings.accrual_policy(cap_months);
            let report = commands::eosb(salary, start, end, policy, &SystemClock)?;
            tracing::info!(
                years = report.years_of_service,
                accrued = report.accrued,
                cap_months = ?report.cap_months,
                "end-of-service benefit computed"
            );
            print_json(&report)?;
        }

        Commands::Totals { assets } => {
            let records = read_assets(&assets)?;
            let totals = commands::totals(&records)?;
            tracing::info!(records = records.len(), net_worth = totals.net_worth, "totals computed");
            print_json(&totals)?;
        }

        Commands::Breakdown { assets } => {
            let records = read_assets(&assets)?;
            let rows = commands::breakdown(&records)?;
            tracing::info!(records = records.len(), categories = rows.len(), "breakdown computed");
            print_json(&rows)?;
        }

        Commands::Snapshot { assets, history } => {
            let records = read_assets(&assets)?;
            let mut log = match &history {
                Some(path) if path.exists() => read_history(path)?,
                _ => SnapshotLog::new(),
            };

            let snapshot = commands::snapshot(&records, &mut log, &SystemClock)?;
            tracing::info!(
                snapshot_id = %snapshot.id(),
                net_worth = snapshot.net_worth(),
                history_len = log.len(),
                "snapshot recorded"
            );

            if let Some(path) = &history {
                write_history(path, &log)?;
            }
            print_json(&snapshot)?;
        }
    }

    Ok(())
}

fn read_assets(path: &Path) -> Result<Vec<AssetRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    commands::load_records(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))
}

fn read_history(path: &Path) -> Result<SnapshotLog> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    commands::load_history(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))
}

fn write_history(path: &Path, log: &SnapshotLog) -> Result<()> {
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
