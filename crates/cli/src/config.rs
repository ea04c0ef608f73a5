//! Settings read from the environment (optionally seeded from `.env`).

use anyhow::{Context, Result};

use networth_gratuity::AccrualPolicy;

/// Months of base pay at which accruals are capped. Unset means uncapped.
pub const EOSB_CAP_MONTHS_ENV: &str = "NETWORTH_EOSB_CAP_MONTHS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub eosb_cap_months: Option<u32>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let eosb_cap_months = match lookup(EOSB_CAP_MONTHS_ENV) {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u32>()
                    .with_context(|| format!("{EOSB_CAP_MONTHS_ENV} must be a whole number of months, got {raw:?}"))?,
            ),
            _ => None,
        };

        Ok(Self { eosb_cap_months })
    }

    /// Accrual policy, with a command-line cap taking precedence.
    pub fn accrual_policy(&self, cap_override: Option<u32>) -> AccrualPolicy {
        match cap_override.or(self.eosb_cap_months) {
            Some(months) => AccrualPolicy::capped_at_months(months),
            None => AccrualPolicy::uncapped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| {
            assert_eq!(key, EOSB_CAP_MONTHS_ENV);
            value.map(str::to_string)
        }
    }

    #[test]
    fn cap_is_off_unless_configured() {
        let settings = Settings::from_lookup(lookup(None)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.accrual_policy(None), AccrualPolicy::uncapped());

        let blank = Settings::from_lookup(lookup(Some("  "))).unwrap();
        assert_eq!(blank.eosb_cap_months, None);
    }

    #[test]
    fn reads_cap_from_environment() {
        let settings = Settings::from_lookup(lookup(Some("24"))).unwrap();
        assert_eq!(settings.accrual_policy(None), AccrualPolicy::capped_at_months(24));
    }

    #[test]
    fn flag_overrides_environment() {
        let settings = Settings::from_lookup(lookup(Some("24"))).unwrap();
        assert_eq!(settings.accrual_policy(Some(12)), AccrualPolicy::capped_at_months(12));
    }

    #[test]
    fn rejects_malformed_cap() {
        let err = Settings::from_lookup(lookup(Some("two years"))).unwrap_err();
        assert!(err.to_string().contains(EOSB_CAP_MONTHS_ENV));
    }
}
