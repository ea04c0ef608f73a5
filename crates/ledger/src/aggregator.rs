//! Net-worth aggregation over asset records.
//!
//! A pure reduction: the output reflects exactly the collection handed in, in
//! any order. Callers that read from a live store must hand in a consistent
//! read; no isolation is provided here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use networth_core::{AssetId, Clock, DomainError, ValueObject};

use crate::asset::{Asset, AssetRecord, RecordDefect};
use crate::category::{AssetCategory, Pool};
use crate::snapshot::Snapshot;

/// Aggregate totals in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_assets: i64,
    pub total_liabilities: i64,
    pub net_worth: i64,
}

impl ValueObject for Totals {}

impl Totals {
    /// Totals of already-validated assets.
    pub fn from_assets<'a, I>(assets: I) -> Result<Self, AggregationError>
    where
        I: IntoIterator<Item = &'a Asset>,
    {
        let mut acc = Accumulator::default();
        for asset in assets {
            acc.add(asset.category(), asset.value());
        }
        acc.finish()
    }
}

/// Per-category subtotal for a balance-sheet view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: AssetCategory,
    pub pool: Pool,
    pub total: i64,
    pub count: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("invalid record #{index} ({asset_id}): {defect}")]
    InvalidRecord {
        index: usize,
        asset_id: AssetId,
        defect: RecordDefect,
    },

    #[error("total does not fit in minor units")]
    Overflow,
}

impl From<AggregationError> for DomainError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::InvalidRecord { .. } => DomainError::validation(err.to_string()),
            AggregationError::Overflow => DomainError::invariant(err.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    assets: i128,
    liabilities: i128,
}

impl Accumulator {
    fn add(&mut self, category: AssetCategory, value: i64) {
        match category.pool() {
            Pool::Assets => self.assets += i128::from(value),
            Pool::Liabilities => self.liabilities += i128::from(value),
        }
    }

    fn finish(self) -> Result<Totals, AggregationError> {
        let total_assets = i64::try_from(self.assets).map_err(|_| AggregationError::Overflow)?;
        let total_liabilities =
            i64::try_from(self.liabilities).map_err(|_| AggregationError::Overflow)?;
        let net_worth = total_assets
            .checked_sub(total_liabilities)
            .ok_or(AggregationError::Overflow)?;

        Ok(Totals {
            total_assets,
            total_liabilities,
            net_worth,
        })
    }
}

fn validated<'a, I>(records: I) -> impl Iterator<Item = Result<(AssetCategory, i64), AggregationError>>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    records.into_iter().enumerate().map(|(index, record)| {
        record
            .validate()
            .map(|category| (category, record.value))
            .map_err(|defect| AggregationError::InvalidRecord {
                index,
                asset_id: record.id,
                defect,
            })
    })
}

/// Reduce records to totals. All-or-nothing: the first malformed record fails
/// the whole call.
pub fn totals<'a, I>(records: I) -> Result<Totals, AggregationError>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let mut acc = Accumulator::default();
    for entry in validated(records) {
        let (category, value) = entry?;
        acc.add(category, value);
    }
    acc.finish()
}

/// Reduce records to a snapshot stamped with the clock's current time.
pub fn aggregate(records: &[AssetRecord], clock: &dyn Clock) -> Result<Snapshot, AggregationError> {
    let totals = totals(records)?;
    Ok(Snapshot::from_totals(totals, clock.now()))
}

/// Subtotals per category present, in category declaration order.
pub fn breakdown<'a, I>(records: I) -> Result<Vec<CategoryTotal>, AggregationError>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let mut sums = [(0i128, 0usize); AssetCategory::ALL.len()];
    for entry in validated(records) {
        let (category, value) = entry?;
        let slot = &mut sums[category as usize];
        slot.0 += i128::from(value);
        slot.1 += 1;
    }

    AssetCategory::ALL
        .into_iter()
        .zip(sums)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(category, (total, count))| {
            Ok(CategoryTotal {
                category,
                pool: category.pool(),
                total: i64::try_from(total).map_err(|_| AggregationError::Overflow)?,
                count,
            })
        })
        .collect()
}
