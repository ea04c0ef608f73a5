//! Two-tier day-rate accrual.
//!
//! - nothing vests before one full year of service;
//! - 21 days of base pay per year for the first five years;
//! - 30 days of base pay per year beyond five years.
//!
//! The daily rate is `monthly_base / 30` and stays fractional throughout. The
//! result is floored once, at the very end.

use networth_core::DomainError;
use thiserror::Error;

/// Service shorter than this accrues nothing.
pub const VESTING_YEARS: f64 = 1.0;

/// Years paid at the first-tier rate.
pub const FIRST_TIER_YEARS: f64 = 5.0;

pub const FIRST_TIER_DAYS_PER_YEAR: f64 = 21.0;
pub const SECOND_TIER_DAYS_PER_YEAR: f64 = 30.0;

/// Divisor turning a monthly base into a daily rate.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccrualError {
    #[error("monthly base cannot be negative (got {0})")]
    NegativeBase(i64),

    #[error("years of service must be a finite, non-negative number (got {0})")]
    InvalidDuration(f64),

    #[error("accrued amount does not fit in minor units")]
    Overflow,
}

impl From<AccrualError> for DomainError {
    fn from(err: AccrualError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Compute the accrued benefit in minor units.
///
/// `monthly_base` must already be in minor units (see
/// `networth_core::money::major_to_minor`). Bases beyond 2^53 lose precision in
/// the floating-point intermediate.
pub fn compute_accrual(monthly_base: i64, years_of_service: f64) -> Result<i64, AccrualError> {
    if monthly_base < 0 {
        return Err(AccrualError::NegativeBase(monthly_base));
    }
    if !years_of_service.is_finite() || years_of_service < 0.0 {
        return Err(AccrualError::InvalidDuration(years_of_service));
    }

    if years_of_service < VESTING_YEARS {
        return Ok(0);
    }

    let daily = monthly_base as f64 / DAYS_PER_MONTH;

    let gratuity = if years_of_service <= FIRST_TIER_YEARS {
        years_of_service * FIRST_TIER_DAYS_PER_YEAR * daily
    } else {
        let first = FIRST_TIER_YEARS * FIRST_TIER_DAYS_PER_YEAR * daily;
        let additional = (years_of_service - FIRST_TIER_YEARS) * SECOND_TIER_DAYS_PER_YEAR * daily;
        first + additional
    };

    let floored = gratuity.floor();
    if floored >= i64::MAX as f64 {
        return Err(AccrualError::Overflow);
    }
    Ok(floored as i64)
}
