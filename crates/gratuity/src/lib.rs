//! End-of-service benefit (EOSB) accrual.
//!
//! Pure calculation only: no IO, no logging. The computed amount is stored by
//! the caller as the `value` of an EOSB-category asset.

pub mod accrual;
pub mod policy;
pub mod tenure;

pub use accrual::{AccrualError, compute_accrual};
pub use policy::AccrualPolicy;
pub use tenure::{DAYS_PER_YEAR, ServicePeriod, years_between};
