//! Net-worth history: one snapshot per portfolio change.

use std::collections::BTreeMap;

use thiserror::Error;

use networth_core::{AggregateId, AssetId, DomainError, Entity, OwnerId};
use networth_events::{EventEnvelope, Projection};

use crate::aggregator::{AggregationError, Totals};
use crate::asset::Asset;
use crate::portfolio::PortfolioEvent;
use crate::snapshot::{Snapshot, SnapshotLog};

pub const AGGREGATE_TYPE: &str = "portfolio";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("envelope for owner {found} applied to history of {expected}")]
    OwnerMismatch { expected: OwnerId, found: OwnerId },

    #[error("envelope from portfolio {found} applied to history of {expected}")]
    StreamMismatch { expected: AggregateId, found: AggregateId },

    #[error("non-monotonic sequence number (last={last}, found={found})")]
    NonMonotonicSequence { last: u64, found: u64 },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Log(#[from] DomainError),
}

impl From<HistoryError> for DomainError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Aggregation(e) => e.into(),
            HistoryError::Log(e) => e,
            other => DomainError::invariant(other.to_string()),
        }
    }
}

/// Projection: one portfolio's events → append-only snapshot log.
///
/// The snapshot timestamp is the event's `occurred_at`, so replaying a stream
/// rebuilds the same history.
#[derive(Debug, Clone)]
pub struct NetWorthHistory {
    owner_id: OwnerId,
    portfolio_id: AggregateId,
    assets: BTreeMap<AssetId, Asset>,
    log: SnapshotLog,
    last_sequence: u64,
}

impl NetWorthHistory {
    pub fn new(owner_id: OwnerId, portfolio_id: AggregateId) -> Self {
        Self {
            owner_id,
            portfolio_id,
            assets: BTreeMap::new(),
            log: SnapshotLog::new(),
            last_sequence: 0,
        }
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn portfolio_id(&self) -> AggregateId {
        self.portfolio_id
    }

    pub fn log(&self) -> &SnapshotLog {
        &self.log
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.log.latest()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Apply one envelope. Returns the appended snapshot, or `None` when the
    /// envelope was already applied.
    pub fn apply_envelope(
        &mut self,
        envelope: &EventEnvelope<PortfolioEvent>,
    ) -> Result<Option<Snapshot>, HistoryError> {
        if envelope.owner_id() != self.owner_id {
            return Err(HistoryError::OwnerMismatch {
                expected: self.owner_id,
                found: envelope.owner_id(),
            });
        }
        if envelope.aggregate_id() != self.portfolio_id {
            return Err(HistoryError::StreamMismatch {
                expected: self.portfolio_id,
                found: envelope.aggregate_id(),
            });
        }

        let seq = envelope.sequence_number();
        let last = self.last_sequence;

        if seq == 0 {
            return Err(HistoryError::NonMonotonicSequence { last, found: seq });
        }
        if seq <= last {
            return Ok(None);
        }
        if seq != last + 1 {
            return Err(HistoryError::NonMonotonicSequence { last, found: seq });
        }

        let event = envelope.payload();
        let mut next = self.assets.clone();
        match event {
            PortfolioEvent::AssetAdded(e) => {
                next.insert(*e.asset.id(), e.asset.clone());
            }
            PortfolioEvent::AssetEdited(e) => {
                next.insert(*e.asset.id(), e.asset.clone());
            }
            PortfolioEvent::AssetRemoved(e) => {
                next.remove(&e.asset_id);
            }
        }

        // Compute and append before committing, so a failure leaves the
        // projection untouched.
        let totals = Totals::from_assets(next.values())?;
        let snapshot = Snapshot::from_totals(totals, envelope.occurred_at());
        self.log.append(snapshot)?;

        self.assets = next;
        self.last_sequence = seq;
        Ok(Some(snapshot))
    }
}

impl Projection for NetWorthHistory {
    type Ev = PortfolioEvent;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>) {
        match self.apply_envelope(envelope) {
            Ok(Some(snapshot)) => tracing::debug!(
                owner_id = %self.owner_id,
                seq = envelope.sequence_number(),
                event_type = envelope.event_type(),
                net_worth = snapshot.net_worth(),
                "net worth snapshot recorded"
            ),
            Ok(None) => tracing::debug!(
                owner_id = %self.owner_id,
                seq = envelope.sequence_number(),
                "duplicate envelope skipped"
            ),
            Err(err) => tracing::warn!(
                owner_id = %self.owner_id,
                portfolio_id = %self.portfolio_id,
                seq = envelope.sequence_number(),
                error = %err,
                "failed to apply portfolio event to net worth history"
            ),
        }
    }
}
