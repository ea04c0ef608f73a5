use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use networth_core::{AssetId, Entity};

use crate::category::AssetCategory;

/// Asset document as read from the store, before validation.
///
/// `category` and `value` are deliberately unchecked so that aggregation can
/// report malformed documents instead of failing to load them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: AssetId,
    pub name: String,
    pub category: String,
    /// Amount in minor units (e.g. fils). Must be positive.
    pub value: i64,
    #[serde(rename = "qty", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

/// Why a stored record cannot take part in aggregation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordDefect {
    #[error("value must be a positive amount of minor units (got {0})")]
    NonPositiveValue(i64),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}

impl AssetRecord {
    /// Check the two fields aggregation depends on.
    pub fn validate(&self) -> Result<AssetCategory, RecordDefect> {
        let category = self
            .category
            .parse::<AssetCategory>()
            .map_err(|_| RecordDefect::UnknownCategory(self.category.clone()))?;
        if self.value <= 0 {
            return Err(RecordDefect::NonPositiveValue(self.value));
        }
        Ok(category)
    }
}

/// A validated holding or obligation.
///
/// `value` is strictly positive; for real estate with both sub-values present
/// the writer keeps `value == market_value - loan_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssetRecord", into = "AssetRecord")]
pub struct Asset {
    id: AssetId,
    name: String,
    category: AssetCategory,
    value: i64,
    quantity: Option<f64>,
    ticker: Option<String>,
    market_value: Option<i64>,
    loan_value: Option<i64>,
    account_number: Option<String>,
    notes: Option<String>,
    last_updated: DateTime<Utc>,
}

/// Fields an asset is built from once its value has been settled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssetParts {
    pub id: AssetId,
    pub name: String,
    pub category: AssetCategory,
    pub value: i64,
    pub quantity: Option<f64>,
    pub ticker: Option<String>,
    pub market_value: Option<i64>,
    pub loan_value: Option<i64>,
    pub account_number: Option<String>,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Asset {
    /// Build from parts whose value the caller has already checked.
    pub(crate) fn from_parts(parts: AssetParts) -> Self {
        debug_assert!(parts.value > 0);
        Self {
            id: parts.id,
            name: parts.name,
            category: parts.category,
            value: parts.value,
            quantity: parts.quantity,
            ticker: parts.ticker,
            market_value: parts.market_value,
            loan_value: parts.loan_value,
            account_number: parts.account_number,
            notes: parts.notes,
            last_updated: parts.last_updated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> AssetCategory {
        self.category
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn quantity(&self) -> Option<f64> {
        self.quantity
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn market_value(&self) -> Option<i64> {
        self.market_value
    }

    pub fn loan_value(&self) -> Option<i64> {
        self.loan_value
    }

    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn to_record(&self) -> AssetRecord {
        AssetRecord {
            id: self.id,
            name: self.name.clone(),
            category: self.category.as_str().to_string(),
            value: self.value,
            quantity: self.quantity,
            ticker: self.ticker.clone(),
            market_value: self.market_value,
            loan_value: self.loan_value,
            account_number: self.account_number.clone(),
            notes: self.notes.clone(),
            last_updated: self.last_updated,
        }
    }
}

impl Entity for Asset {
    type Id = AssetId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

impl TryFrom<AssetRecord> for Asset {
    type Error = RecordDefect;

    fn try_from(record: AssetRecord) -> Result<Self, Self::Error> {
        let category = record.validate()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            category,
            value: record.value,
            quantity: record.quantity,
            ticker: record.ticker,
            market_value: record.market_value,
            loan_value: record.loan_value,
            account_number: record.account_number,
            notes: record.notes,
            last_updated: record.last_updated,
        })
    }
}

impl TryFrom<&AssetRecord> for Asset {
    type Error = RecordDefect;

    fn try_from(record: &AssetRecord) -> Result<Self, Self::Error> {
        Asset::try_from(record.clone())
    }
}

impl From<Asset> for AssetRecord {
    fn from(asset: Asset) -> Self {
        asset.to_record()
    }
}
