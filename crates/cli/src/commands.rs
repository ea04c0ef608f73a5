//! Command implementations. File handling stays in `main`; these work on
//! readers and values so they can be tested directly.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use networth_core::{Clock, money};
use networth_gratuity::{AccrualPolicy, ServicePeriod};
use networth_ledger::{AssetRecord, CategoryTotal, Snapshot, SnapshotLog, Totals};

/// Result of the `eosb` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EosbReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub years_of_service: f64,
    /// Monthly base in minor units.
    pub monthly_base: i64,
    /// Accrued benefit in minor units; store this as the asset value.
    pub accrued: i64,
    pub accrued_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_months: Option<u32>,
}

/// Compute a benefit from a major-unit salary and service dates. A missing
/// end date means "today".
pub fn eosb(
    salary_major: f64,
    start: NaiveDate,
    end: Option<NaiveDate>,
    policy: AccrualPolicy,
    clock: &dyn Clock,
) -> Result<EosbReport> {
    let monthly_base = money::major_to_minor(salary_major).context("invalid monthly salary")?;
    let period = match end {
        Some(end) => ServicePeriod::new(start, end),
        None => ServicePeriod::until_today(start, clock),
    };
    let accrued = policy
        .accrue(monthly_base, &period)
        .context("failed to compute end-of-service benefit")?;

    Ok(EosbReport {
        start: period.start,
        end: period.end,
        years_of_service: period.years(),
        monthly_base,
        accrued,
        accrued_display: money::format_minor(accrued),
        cap_months: policy.cap_months,
    })
}

/// Parse a JSON array of asset documents.
pub fn load_records(reader: impl Read) -> Result<Vec<AssetRecord>> {
    serde_json::from_reader(reader).context("assets must be a JSON array of asset records")
}

/// Parse a JSON snapshot history (append-only, time ordered).
pub fn load_history(reader: impl Read) -> Result<SnapshotLog> {
    serde_json::from_reader(reader).context("history must be a time-ordered JSON array of snapshots")
}

pub fn totals(records: &[AssetRecord]) -> Result<Totals> {
    Ok(networth_ledger::totals(records)?)
}

pub fn breakdown(records: &[AssetRecord]) -> Result<Vec<CategoryTotal>> {
    Ok(networth_ledger::breakdown(records)?)
}

/// Aggregate `records` into a new snapshot and append it to `history`.
pub fn snapshot(records: &[AssetRecord], history: &mut SnapshotLog, clock: &dyn Clock) -> Result<Snapshot> {
    let snapshot = networth_ledger::aggregate(records, clock)?;
    history
        .append(snapshot)
        .context("snapshot does not extend the history")?;
    Ok(snapshot)
}
