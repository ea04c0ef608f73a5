//! Net-worth ledger: asset records, aggregation and history.
//!
//! The calculation modules (`aggregator`, `snapshot`) are pure: no IO, no
//! logging. `portfolio` is the event-sourced writer whose values the
//! aggregator trusts; `history` projects its events into snapshots.

pub mod aggregator;
pub mod asset;
pub mod category;
pub mod history;
pub mod portfolio;
pub mod snapshot;

pub use aggregator::{AggregationError, CategoryTotal, Totals, aggregate, breakdown, totals};
pub use asset::{Asset, AssetRecord, RecordDefect};
pub use category::{AssetCategory, Pool};
pub use history::{HistoryError, NetWorthHistory};
pub use portfolio::{
    AddAsset, AssetAdded, AssetEdited, AssetInput, AssetRemoved, EditAsset, Portfolio,
    PortfolioCommand, PortfolioEvent, PortfolioId, RemoveAsset, Valuation,
};
pub use snapshot::{Snapshot, SnapshotLog};
