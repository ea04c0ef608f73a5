//! Point-in-time net-worth records and their append-only log.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use networth_core::{DomainError, DomainResult, SnapshotId, ValueObject};

use crate::aggregator::Totals;

/// Immutable aggregate totals at one instant.
///
/// There are no mutators: a changed portfolio produces a new snapshot.
/// Deserialization re-checks `netWorth == totalAssets - totalLiabilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SnapshotRecord")]
pub struct Snapshot {
    id: SnapshotId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    total_assets: i64,
    total_liabilities: i64,
    net_worth: i64,
}

impl ValueObject for Snapshot {}

/// Persisted form of a snapshot, before the totals are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord {
    id: SnapshotId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    total_assets: i64,
    total_liabilities: i64,
    net_worth: i64,
}

impl TryFrom<SnapshotRecord> for Snapshot {
    type Error = DomainError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let totals = Totals {
            total_assets: record.total_assets,
            total_liabilities: record.total_liabilities,
            net_worth: record.net_worth,
        };
        ensure_balanced(&totals)?;
        Ok(Self::with_id(record.id, totals, record.timestamp))
    }
}

/// Pools are non-negative and `net_worth == total_assets - total_liabilities`.
fn ensure_balanced(totals: &Totals) -> DomainResult<()> {
    if totals.total_assets < 0 || totals.total_liabilities < 0 {
        return Err(DomainError::invariant(format!(
            "negative pool total (assets={}, liabilities={})",
            totals.total_assets, totals.total_liabilities
        )));
    }
    let expected = i128::from(totals.total_assets) - i128::from(totals.total_liabilities);
    if i128::from(totals.net_worth) != expected {
        return Err(DomainError::invariant(format!(
            "net worth {} does not equal assets {} minus liabilities {}",
            totals.net_worth, totals.total_assets, totals.total_liabilities
        )));
    }
    Ok(())
}

impl Snapshot {
    pub fn from_totals(totals: Totals, timestamp: DateTime<Utc>) -> Self {
        Self::with_id(SnapshotId::new(), totals, timestamp)
    }

    pub fn with_id(id: SnapshotId, totals: Totals, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            total_assets: totals.total_assets,
            total_liabilities: totals.total_liabilities,
            net_worth: totals.net_worth,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn total_assets(&self) -> i64 {
        self.total_assets
    }

    pub fn total_liabilities(&self) -> i64 {
        self.total_liabilities
    }

    pub fn net_worth(&self) -> i64 {
        self.net_worth
    }

    pub fn totals(&self) -> Totals {
        Totals {
            total_assets: self.total_assets,
            total_liabilities: self.total_liabilities,
            net_worth: self.net_worth,
        }
    }
}

/// Time-ordered, append-only sequence of snapshots.
///
/// Timestamps never decrease along the log; ties are allowed since several
/// changes can land within the same millisecond.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SnapshotLog {
    entries: Vec<Snapshot>,
    #[serde(skip)]
    ids: HashSet<SnapshotId>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries, re-checking ordering.
    pub fn from_entries(entries: impl IntoIterator<Item = Snapshot>) -> DomainResult<Self> {
        let mut log = Self::new();
        for snapshot in entries {
            log.append(snapshot)?;
        }
        Ok(log)
    }

    pub fn append(&mut self, snapshot: Snapshot) -> DomainResult<()> {
        ensure_balanced(&snapshot.totals())?;
        if self.ids.contains(&snapshot.id) {
            return Err(DomainError::conflict(format!(
                "snapshot {} already recorded",
                snapshot.id
            )));
        }
        if let Some(latest) = self.latest() {
            if snapshot.timestamp < latest.timestamp {
                return Err(DomainError::conflict(format!(
                    "snapshot at {} predates latest entry at {}",
                    snapshot.timestamp, latest.timestamp
                )));
            }
        }

        self.ids.insert(snapshot.id);
        self.entries.push(snapshot);
        Ok(())
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Entries with `from <= timestamp <= to`.
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> &[Snapshot] {
        let start = self.entries.partition_point(|s| s.timestamp < from);
        let end = self.entries.partition_point(|s| s.timestamp <= to);
        if start >= end {
            return &[];
        }
        &self.entries[start..end]
    }
}

impl<'de> Deserialize<'de> for SnapshotLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<Snapshot>::deserialize(deserializer)?;
        SnapshotLog::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a SnapshotLog {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
