use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use networth_core::{Aggregate, AggregateId, AggregateRoot, AssetId, DomainError, Entity, OwnerId};
use networth_events::Event;
use networth_gratuity::{AccrualPolicy, ServicePeriod};

use crate::aggregator::{AggregationError, Totals};
use crate::asset::{Asset, AssetParts};
use crate::category::AssetCategory;

/// Portfolio identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioId(pub AggregateId);

impl PortfolioId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Minimum length of an asset's display name.
pub const MIN_NAME_LEN: usize = 2;

/// Where an asset's stored value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Valuation {
    /// Value entered directly, in minor units.
    Amount { value: i64 },
    /// Real estate: equity = market value minus outstanding loan.
    #[serde(rename_all = "camelCase")]
    Property { market_value: i64, loan_value: i64 },
    /// End-of-service benefit accrued over a service period.
    #[serde(rename_all = "camelCase")]
    Gratuity {
        monthly_base: i64,
        period: ServicePeriod,
        #[serde(default)]
        policy: AccrualPolicy,
    },
}

/// User-supplied fields of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub name: String,
    pub category: AssetCategory,
    pub valuation: Valuation,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Aggregate root: Portfolio (one owner's current assets and liabilities).
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    id: PortfolioId,
    owner_id: Option<OwnerId>,
    assets: BTreeMap<AssetId, Asset>,
    version: u64,
    created: bool,
    last_occurred_at: Option<DateTime<Utc>>,
}

impl Portfolio {
    /// Empty aggregate for rehydration.
    pub fn empty(id: PortfolioId) -> Self {
        Self {
            id,
            owner_id: None,
            assets: BTreeMap::new(),
            version: 0,
            created: false,
            last_occurred_at: None,
        }
    }

    pub fn id_typed(&self) -> PortfolioId {
        self.id
    }

    pub fn owner_id(&self) -> Option<OwnerId> {
        self.owner_id
    }

    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Business time of the latest applied event.
    pub fn last_occurred_at(&self) -> Option<DateTime<Utc>> {
        self.last_occurred_at
    }

    /// Current net-worth totals.
    pub fn totals(&self) -> Result<Totals, AggregationError> {
        Totals::from_assets(self.assets.values())
    }
}

impl AggregateRoot for Portfolio {
    type Id = PortfolioId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddAsset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAsset {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset_id: AssetId,
    pub input: AssetInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditAsset (replaces every user-supplied field, value recomputed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditAsset {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset_id: AssetId,
    pub input: AssetInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveAsset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAsset {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset_id: AssetId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortfolioCommand {
    AddAsset(AddAsset),
    EditAsset(EditAsset),
    RemoveAsset(RemoveAsset),
}

/// Event: AssetAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAdded {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset: Asset,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AssetEdited. `previous` is the archived prior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEdited {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset: Asset,
    pub previous: Asset,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AssetRemoved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRemoved {
    pub owner_id: OwnerId,
    pub portfolio_id: PortfolioId,
    pub asset_id: AssetId,
    pub previous: Asset,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortfolioEvent {
    AssetAdded(AssetAdded),
    AssetEdited(AssetEdited),
    AssetRemoved(AssetRemoved),
}

impl PortfolioEvent {
    pub fn owner_id(&self) -> OwnerId {
        match self {
            PortfolioEvent::AssetAdded(e) => e.owner_id,
            PortfolioEvent::AssetEdited(e) => e.owner_id,
            PortfolioEvent::AssetRemoved(e) => e.owner_id,
        }
    }
}

impl Event for PortfolioEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PortfolioEvent::AssetAdded(_) => "portfolio.asset.added",
            PortfolioEvent::AssetEdited(_) => "portfolio.asset.edited",
            PortfolioEvent::AssetRemoved(_) => "portfolio.asset.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PortfolioEvent::AssetAdded(e) => e.occurred_at,
            PortfolioEvent::AssetEdited(e) => e.occurred_at,
            PortfolioEvent::AssetRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Portfolio {
    type Command = PortfolioCommand;
    type Event = PortfolioEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PortfolioEvent::AssetAdded(e) => {
                self.id = e.portfolio_id;
                if self.owner_id.is_none() {
                    self.owner_id = Some(e.owner_id);
                    self.created = true;
                }
                self.assets.insert(*e.asset.id(), e.asset.clone());
            }
            PortfolioEvent::AssetEdited(e) => {
                self.assets.insert(*e.asset.id(), e.asset.clone());
            }
            PortfolioEvent::AssetRemoved(e) => {
                self.assets.remove(&e.asset_id);
            }
        }

        let at = event.occurred_at();
        self.last_occurred_at = Some(self.last_occurred_at.map_or(at, |last| last.max(at)));
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PortfolioCommand::AddAsset(cmd) => self.handle_add(cmd),
            PortfolioCommand::EditAsset(cmd) => self.handle_edit(cmd),
            PortfolioCommand::RemoveAsset(cmd) => self.handle_remove(cmd),
        }
    }
}

impl Portfolio {
    fn ensure_owner(&self, owner_id: OwnerId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.owner_id != Some(owner_id) {
            return Err(DomainError::invariant("owner mismatch"));
        }
        Ok(())
    }

    fn ensure_portfolio_id(&self, portfolio_id: PortfolioId) -> Result<(), DomainError> {
        if self.id != portfolio_id {
            return Err(DomainError::invariant("portfolio_id mismatch"));
        }
        Ok(())
    }

    /// Events must not predate the stream's latest event; snapshots derived
    /// from them are kept in time order.
    fn ensure_not_backdated(&self, occurred_at: DateTime<Utc>) -> Result<(), DomainError> {
        match self.last_occurred_at {
            Some(last) if occurred_at < last => Err(DomainError::conflict(format!(
                "change at {occurred_at} predates the latest change at {last}"
            ))),
            _ => Ok(()),
        }
    }

    fn existing(&self, asset_id: AssetId) -> Result<&Asset, DomainError> {
        self.assets.get(&asset_id).ok_or_else(DomainError::not_found)
    }

    fn handle_add(&self, cmd: &AddAsset) -> Result<Vec<PortfolioEvent>, DomainError> {
        self.ensure_owner(cmd.owner_id)?;
        self.ensure_portfolio_id(cmd.portfolio_id)?;
        self.ensure_not_backdated(cmd.occurred_at)?;

        if self.assets.contains_key(&cmd.asset_id) {
            return Err(DomainError::conflict("asset already exists"));
        }

        let asset = settle(cmd.asset_id, &cmd.input, cmd.occurred_at)?;

        Ok(vec![PortfolioEvent::AssetAdded(AssetAdded {
            owner_id: cmd.owner_id,
            portfolio_id: cmd.portfolio_id,
            asset,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditAsset) -> Result<Vec<PortfolioEvent>, DomainError> {
        self.ensure_owner(cmd.owner_id)?;
        self.ensure_portfolio_id(cmd.portfolio_id)?;
        self.ensure_not_backdated(cmd.occurred_at)?;

        let previous = self.existing(cmd.asset_id)?.clone();
        let asset = settle(cmd.asset_id, &cmd.input, cmd.occurred_at)?;

        Ok(vec![PortfolioEvent::AssetEdited(AssetEdited {
            owner_id: cmd.owner_id,
            portfolio_id: cmd.portfolio_id,
            asset,
            previous,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveAsset) -> Result<Vec<PortfolioEvent>, DomainError> {
        self.ensure_owner(cmd.owner_id)?;
        self.ensure_portfolio_id(cmd.portfolio_id)?;
        self.ensure_not_backdated(cmd.occurred_at)?;

        let previous = self.existing(cmd.asset_id)?.clone();

        Ok(vec![PortfolioEvent::AssetRemoved(AssetRemoved {
            owner_id: cmd.owner_id,
            portfolio_id: cmd.portfolio_id,
            asset_id: cmd.asset_id,
            previous,
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// Validate user input and compute the stored value.
fn settle(id: AssetId, input: &AssetInput, at: DateTime<Utc>) -> Result<Asset, DomainError> {
    let name = input.name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }

    if let Some(qty) = input.quantity {
        if !qty.is_finite() || qty < 0.0 {
            return Err(DomainError::validation("quantity must be a non-negative number"));
        }
    }

    let (value, market_value, loan_value) = match &input.valuation {
        Valuation::Amount { value } => (*value, None, None),
        Valuation::Property {
            market_value,
            loan_value,
        } => {
            if input.category != AssetCategory::RealEstate {
                return Err(DomainError::validation(
                    "market/loan valuation only applies to real estate",
                ));
            }
            if *market_value < 0 || *loan_value < 0 {
                return Err(DomainError::validation(
                    "market value and loan cannot be negative",
                ));
            }
            let equity = market_value - loan_value;
            if equity <= 0 {
                return Err(DomainError::validation(
                    "market value must exceed the outstanding loan",
                ));
            }
            (equity, Some(*market_value), Some(*loan_value))
        }
        Valuation::Gratuity {
            monthly_base,
            period,
            policy,
        } => {
            if input.category != AssetCategory::Eosb {
                return Err(DomainError::validation(
                    "gratuity valuation only applies to EOSB assets",
                ));
            }
            let accrued = policy.accrue(*monthly_base, period)?;
            if accrued == 0 {
                return Err(DomainError::validation(
                    "no end-of-service benefit has accrued yet",
                ));
            }
            (accrued, None, None)
        }
    };

    if value <= 0 {
        return Err(DomainError::validation("value must be positive"));
    }

    Ok(Asset::from_parts(AssetParts {
        id,
        name: name.to_string(),
        category: input.category,
        value,
        quantity: input.quantity,
        ticker: non_blank(input.ticker.as_deref()),
        market_value,
        loan_value,
        account_number: non_blank(input.account_number.as_deref()),
        notes: non_blank(input.notes.as_deref()),
        last_updated: at,
    }))
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use networth_gratuity::compute_accrual;
    use proptest::prelude::*;

    struct Fixture {
        owner_id: OwnerId,
        portfolio_id: PortfolioId,
        portfolio: Portfolio,
        clock: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            let portfolio_id = PortfolioId::new(AggregateId::new());
            Self {
                owner_id: OwnerId::new(),
                portfolio_id,
                portfolio: Portfolio::empty(portfolio_id),
                clock: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            }
        }

        fn tick(&mut self) -> DateTime<Utc> {
            self.clock += Duration::minutes(1);
            self.clock
        }

        fn execute(&mut self, cmd: PortfolioCommand) -> Result<Vec<PortfolioEvent>, DomainError> {
            let events = self.portfolio.handle(&cmd)?;
            for e in &events {
                self.portfolio.apply(e);
            }
            Ok(events)
        }

        fn add(&mut self, input: AssetInput) -> Result<AssetId, DomainError> {
            let asset_id = AssetId::new();
            let occurred_at = self.tick();
            self.execute(PortfolioCommand::AddAsset(AddAsset {
                owner_id: self.owner_id,
                portfolio_id: self.portfolio_id,
                asset_id,
                input,
                occurred_at,
            }))?;
            Ok(asset_id)
        }

        fn edit(&mut self, asset_id: AssetId, input: AssetInput) -> Result<Vec<PortfolioEvent>, DomainError> {
            let occurred_at = self.tick();
            self.execute(PortfolioCommand::EditAsset(EditAsset {
                owner_id: self.owner_id,
                portfolio_id: self.portfolio_id,
                asset_id,
                input,
                occurred_at,
            }))
        }

        fn remove(&mut self, asset_id: AssetId) -> Result<Vec<PortfolioEvent>, DomainError> {
            let occurred_at = self.tick();
            self.execute(PortfolioCommand::RemoveAsset(RemoveAsset {
                owner_id: self.owner_id,
                portfolio_id: self.portfolio_id,
                asset_id,
                occurred_at,
            }))
        }
    }

    fn input(category: AssetCategory, valuation: Valuation) -> AssetInput {
        AssetInput {
            name: "Test holding".to_string(),
            category,
            valuation,
            quantity: None,
            ticker: None,
            account_number: None,
            notes: None,
        }
    }

    fn amount(category: AssetCategory, value: i64) -> AssetInput {
        input(category, Valuation::Amount { value })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_then_totals() {
        let mut f = Fixture::new();
        f.add(amount(AssetCategory::Cash, 500_000)).unwrap();
        f.add(amount(AssetCategory::Liability, 120_000)).unwrap();

        let totals = f.portfolio.totals().unwrap();
        assert_eq!(totals.net_worth, 380_000);
        assert_eq!(f.portfolio.version(), 2);
        assert_eq!(f.portfolio.owner_id(), Some(f.owner_id));
    }

    #[test]
    fn property_value_is_market_minus_loan() {
        let mut f = Fixture::new();
        let id = f
            .add(input(
                AssetCategory::RealEstate,
                Valuation::Property {
                    market_value: 200_000_000,
                    loan_value: 50_000_000,
                },
            ))
            .unwrap();

        let asset = f.portfolio.asset(id).unwrap();
        assert_eq!(asset.value(), 150_000_000);
        assert_eq!(asset.market_value(), Some(200_000_000));
        assert_eq!(asset.loan_value(), Some(50_000_000));
    }

    #[test]
    fn underwater_property_is_rejected() {
        let mut f = Fixture::new();
        let err = f
            .add(input(
                AssetCategory::RealEstate,
                Valuation::Property {
                    market_value: 100,
                    loan_value: 100,
                },
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(f.portfolio.is_empty());
    }

    #[test]
    fn property_valuation_requires_real_estate() {
        let mut f = Fixture::new();
        let err = f
            .add(input(
                AssetCategory::Vehicle,
                Valuation::Property {
                    market_value: 100,
                    loan_value: 10,
                },
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn gratuity_is_valued_by_the_accrual_calculator() {
        let mut f = Fixture::new();
        let period = ServicePeriod::new(date(2018, 1, 1), date(2025, 1, 1));
        let id = f
            .add(input(
                AssetCategory::Eosb,
                Valuation::Gratuity {
                    monthly_base: 1_000_000,
                    period,
                    policy: AccrualPolicy::default(),
                },
            ))
            .unwrap();

        let expected = compute_accrual(1_000_000, period.years()).unwrap();
        assert_eq!(f.portfolio.asset(id).unwrap().value(), expected);
    }

    #[test]
    fn gratuity_under_one_year_is_rejected() {
        let mut f = Fixture::new();
        let err = f
            .add(input(
                AssetCategory::Eosb,
                Valuation::Gratuity {
                    monthly_base: 1_000_000,
                    period: ServicePeriod::new(date(2024, 6, 1), date(2025, 1, 1)),
                    policy: AccrualPolicy::default(),
                },
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("accrued")));
    }

    #[test]
    fn gratuity_with_negative_base_is_a_validation_error() {
        let mut f = Fixture::new();
        let err = f
            .add(input(
                AssetCategory::Eosb,
                Valuation::Gratuity {
                    monthly_base: -1,
                    period: ServicePeriod::new(date(2010, 1, 1), date(2025, 1, 1)),
                    policy: AccrualPolicy::default(),
                },
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_amounts_and_short_names_are_rejected() {
        let mut f = Fixture::new();
        assert!(f.add(amount(AssetCategory::Cash, 0)).is_err());
        assert!(f.add(amount(AssetCategory::Cash, -5)).is_err());

        let mut short = amount(AssetCategory::Cash, 10);
        short.name = " A ".to_string();
        assert!(matches!(f.add(short), Err(DomainError::Validation(_))));

        let mut bad_qty = amount(AssetCategory::Equity, 10);
        bad_qty.quantity = Some(-1.0);
        assert!(matches!(f.add(bad_qty), Err(DomainError::Validation(_))));
    }

    #[test]
    fn edit_recomputes_value_and_archives_previous() {
        let mut f = Fixture::new();
        let id = f.add(amount(AssetCategory::Crypto, 1_000)).unwrap();

        let events = f.edit(id, amount(AssetCategory::Crypto, 2_500)).unwrap();
        match &events[0] {
            PortfolioEvent::AssetEdited(e) => {
                assert_eq!(e.previous.value(), 1_000);
                assert_eq!(e.asset.value(), 2_500);
                assert_eq!(e.asset.id(), &id);
            }
            other => panic!("expected AssetEdited, got {other:?}"),
        }
        assert_eq!(f.portfolio.asset(id).unwrap().value(), 2_500);
        assert_eq!(f.portfolio.len(), 1);
    }

    #[test]
    fn edit_and_remove_of_missing_asset_is_not_found() {
        let mut f = Fixture::new();
        f.add(amount(AssetCategory::Cash, 1)).unwrap();
        let missing = AssetId::new();
        assert_eq!(f.edit(missing, amount(AssetCategory::Cash, 2)), Err(DomainError::NotFound));
        assert_eq!(f.remove(missing), Err(DomainError::NotFound));
    }

    #[test]
    fn remove_drops_the_asset() {
        let mut f = Fixture::new();
        let keep = f.add(amount(AssetCategory::Cash, 300)).unwrap();
        let gone = f.add(amount(AssetCategory::Vehicle, 700)).unwrap();
        f.remove(gone).unwrap();

        assert!(f.portfolio.asset(gone).is_none());
        assert!(f.portfolio.asset(keep).is_some());
        assert_eq!(f.portfolio.totals().unwrap().total_assets, 300);
    }

    #[test]
    fn duplicate_add_is_a_conflict() {
        let mut f = Fixture::new();
        let asset_id = AssetId::new();
        let cmd = PortfolioCommand::AddAsset(AddAsset {
            owner_id: f.owner_id,
            portfolio_id: f.portfolio_id,
            asset_id,
            input: amount(AssetCategory::Cash, 1),
            occurred_at: f.tick(),
        });
        f.execute(cmd.clone()).unwrap();
        assert!(matches!(f.execute(cmd), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn backdated_changes_are_a_conflict() {
        let mut f = Fixture::new();
        let cash = f.add(amount(AssetCategory::Cash, 100)).unwrap();
        let latest = f.portfolio.last_occurred_at().unwrap();
        let earlier = latest - Duration::hours(1);

        let add = PortfolioCommand::AddAsset(AddAsset {
            owner_id: f.owner_id,
            portfolio_id: f.portfolio_id,
            asset_id: AssetId::new(),
            input: amount(AssetCategory::Cash, 200),
            occurred_at: earlier,
        });
        assert!(matches!(f.execute(add), Err(DomainError::Conflict(_))));

        let edit = PortfolioCommand::EditAsset(EditAsset {
            owner_id: f.owner_id,
            portfolio_id: f.portfolio_id,
            asset_id: cash,
            input: amount(AssetCategory::Cash, 50),
            occurred_at: earlier,
        });
        assert!(matches!(f.execute(edit), Err(DomainError::Conflict(_))));

        let remove = PortfolioCommand::RemoveAsset(RemoveAsset {
            owner_id: f.owner_id,
            portfolio_id: f.portfolio_id,
            asset_id: cash,
            occurred_at: earlier,
        });
        assert!(matches!(f.execute(remove), Err(DomainError::Conflict(_))));

        assert_eq!(f.portfolio.version(), 1);
        assert_eq!(f.portfolio.totals().unwrap().net_worth, 100);

        // Same instant as the latest change is fine.
        let same_instant = PortfolioCommand::AddAsset(AddAsset {
            owner_id: f.owner_id,
            portfolio_id: f.portfolio_id,
            asset_id: AssetId::new(),
            input: amount(AssetCategory::Cash, 200),
            occurred_at: latest,
        });
        f.execute(same_instant).unwrap();
        assert_eq!(f.portfolio.totals().unwrap().net_worth, 300);
    }

    #[test]
    fn other_owner_is_rejected() {
        let mut f = Fixture::new();
        f.add(amount(AssetCategory::Cash, 1)).unwrap();
        f.owner_id = OwnerId::new();
        assert!(matches!(
            f.add(amount(AssetCategory::Cash, 1)),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn blank_optional_text_is_dropped() {
        let mut f = Fixture::new();
        let mut stock = amount(AssetCategory::Equity, 1_000);
        stock.ticker = Some("  NVDA ".to_string());
        stock.notes = Some("   ".to_string());
        let id = f.add(stock).unwrap();

        let asset = f.portfolio.asset(id).unwrap();
        assert_eq!(asset.ticker(), Some("NVDA"));
        assert_eq!(asset.notes(), None);
    }

    #[test]
    fn valuation_reads_tagged_json() {
        let json = r#"{
            "name": "Gratuity",
            "category": "EOSB",
            "valuation": {
                "kind": "gratuity",
                "monthlyBase": 1000000,
                "period": { "start": "2015-01-01", "end": "2025-01-01" }
            }
        }"#;
        let parsed: AssetInput = serde_json::from_str(json).unwrap();
        match parsed.valuation {
            Valuation::Gratuity { monthly_base, policy, .. } => {
                assert_eq!(monthly_base, 1_000_000);
                assert_eq!(policy, AccrualPolicy::uncapped());
            }
            other => panic!("expected gratuity, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn portfolio_totals_track_added_values(
            entries in prop::collection::vec((prop::bool::ANY, 1i64..1_000_000i64), 0..20)
        ) {
            let mut f = Fixture::new();
            let mut expected = 0i64;
            for (is_debt, value) in entries {
                let category = if is_debt { AssetCategory::Liability } else { AssetCategory::Cash };
                f.add(amount(category, value)).unwrap();
                expected += if is_debt { -value } else { value };
            }
            prop_assert_eq!(f.portfolio.totals().unwrap().net_worth, expected);
        }
    }
}
