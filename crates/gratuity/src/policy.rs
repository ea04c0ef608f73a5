//! Optional ceiling on the accrued benefit.

use serde::{Deserialize, Serialize};

use crate::accrual::{AccrualError, compute_accrual};
use crate::tenure::ServicePeriod;

/// Months of base pay commonly used as the statutory ceiling.
pub const STATUTORY_CAP_MONTHS: u32 = 24;

/// How an accrual is finalised.
///
/// The default is uncapped. A cap is applied only when a caller opts in, after
/// the single final floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccrualPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_months: Option<u32>,
}

impl AccrualPolicy {
    pub fn uncapped() -> Self {
        Self { cap_months: None }
    }

    pub fn capped_at_months(months: u32) -> Self {
        Self {
            cap_months: Some(months),
        }
    }

    pub fn statutory() -> Self {
        Self::capped_at_months(STATUTORY_CAP_MONTHS)
    }

    pub fn compute(&self, monthly_base: i64, years_of_service: f64) -> Result<i64, AccrualError> {
        let accrued = compute_accrual(monthly_base, years_of_service)?;

        match self.cap_months {
            None => Ok(accrued),
            Some(months) => {
                let cap = monthly_base
                    .checked_mul(i64::from(months))
                    .ok_or(AccrualError::Overflow)?;
                Ok(accrued.min(cap))
            }
        }
    }

    pub fn accrue(&self, monthly_base: i64, period: &ServicePeriod) -> Result<i64, AccrualError> {
        self.compute(monthly_base, period.years())
    }
}
