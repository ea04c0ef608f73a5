//! Minor currency unit helpers.
//!
//! Every stored or aggregated monetary amount is an `i64` count of minor units
//! (fils, cents). Floating point only appears at the input boundary, where a
//! user types a salary or a price lookup returns a decimal quote.

use crate::error::{DomainError, DomainResult};

/// Minor units per major unit (2-decimal currencies such as AED or USD).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Convert a major-unit amount (e.g. `123.45`) to minor units (`12345`).
///
/// Rounds to the nearest minor unit. Negative, NaN and infinite inputs are
/// rejected rather than clamped.
pub fn major_to_minor(major: f64) -> DomainResult<i64> {
    if !major.is_finite() {
        return Err(DomainError::validation("amount must be a finite number"));
    }
    if major < 0.0 {
        return Err(DomainError::validation("amount cannot be negative"));
    }

    let scaled = (major * MINOR_UNITS_PER_MAJOR as f64).round();
    if scaled >= i64::MAX as f64 {
        return Err(DomainError::validation("amount is out of range"));
    }
    Ok(scaled as i64)
}

/// Render minor units as a plain major-unit decimal string (`-1234.05`).
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let per = MINOR_UNITS_PER_MAJOR as u64;
    format!("{sign}{}.{:02}", abs / per, abs % per)
}
