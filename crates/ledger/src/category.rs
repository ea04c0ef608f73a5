use core::str::FromStr;

use serde::{Deserialize, Serialize};

use networth_core::DomainError;

/// Closed set of holding categories.
///
/// Values are always stored positive; the category alone decides which side
/// of the balance sheet a record lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    Cash,
    Equity,
    RealEstate,
    Crypto,
    Vehicle,
    /// End-of-service benefit accrual.
    Eosb,
    Liability,
}

/// The two partitions used by aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Assets,
    Liabilities,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 7] = [
        AssetCategory::Cash,
        AssetCategory::Equity,
        AssetCategory::RealEstate,
        AssetCategory::Crypto,
        AssetCategory::Vehicle,
        AssetCategory::Eosb,
        AssetCategory::Liability,
    ];

    /// Wire tag (e.g. "REAL_ESTATE").
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Cash => "CASH",
            AssetCategory::Equity => "EQUITY",
            AssetCategory::RealEstate => "REAL_ESTATE",
            AssetCategory::Crypto => "CRYPTO",
            AssetCategory::Vehicle => "VEHICLE",
            AssetCategory::Eosb => "EOSB",
            AssetCategory::Liability => "LIABILITY",
        }
    }

    /// The single branching point of aggregation.
    pub fn pool(self) -> Pool {
        match self {
            AssetCategory::Liability => Pool::Liabilities,
            _ => Pool::Assets,
        }
    }

    pub fn is_liability(self) -> bool {
        self.pool() == Pool::Liabilities
    }

    /// Categories that carry a ticker and quantity.
    pub fn is_market_traded(self) -> bool {
        matches!(self, AssetCategory::Equity | AssetCategory::Crypto)
    }
}

impl core::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown asset category: {s:?}")))
    }
}
