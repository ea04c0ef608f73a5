use uuid::Uuid;

use networth_core::{AggregateId, DomainError, DomainResult, OwnerId};

use crate::envelope::EventEnvelope;
use crate::event::Event;
use crate::projection::Projection;

/// In-memory, append-only stream of one aggregate's events.
///
/// The stream assigns sequence numbers (1, 2, 3, ...) on append; callers hand
/// in bare domain events.
#[derive(Debug, Clone)]
pub struct EventStream<E> {
    owner_id: OwnerId,
    aggregate_id: AggregateId,
    aggregate_type: String,
    envelopes: Vec<EventEnvelope<E>>,
}

impl<E: Event> EventStream<E> {
    pub fn new(owner_id: OwnerId, aggregate_id: AggregateId, aggregate_type: impl Into<String>) -> Self {
        Self {
            owner_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            envelopes: Vec::new(),
        }
    }

    /// Rebuild a stream from persisted envelopes, checking that they belong to
    /// one stream and are numbered without gaps.
    pub fn from_envelopes(
        owner_id: OwnerId,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        envelopes: Vec<EventEnvelope<E>>,
    ) -> DomainResult<Self> {
        let stream = Self::new(owner_id, aggregate_id, aggregate_type);

        for (idx, env) in envelopes.iter().enumerate() {
            if env.owner_id() != stream.owner_id || env.aggregate_id() != stream.aggregate_id {
                return Err(DomainError::invariant(format!(
                    "envelope {idx} belongs to another stream"
                )));
            }
            if env.aggregate_type() != stream.aggregate_type {
                return Err(DomainError::invariant(format!(
                    "envelope {idx} has aggregate type '{}', expected '{}'",
                    env.aggregate_type(),
                    stream.aggregate_type
                )));
            }
            let expected = idx as u64 + 1;
            if env.sequence_number() != expected {
                return Err(DomainError::invariant(format!(
                    "envelope {idx} has sequence {}, expected {expected}",
                    env.sequence_number()
                )));
            }
        }

        Ok(Self { envelopes, ..stream })
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    /// Sequence number of the last event, 0 for an empty stream.
    pub fn version(&self) -> u64 {
        self.envelopes.last().map(|e| e.sequence_number()).unwrap_or(0)
    }

    /// Append events in order and return their envelopes.
    pub fn append(&mut self, events: impl IntoIterator<Item = E>) -> &[EventEnvelope<E>] {
        let start = self.envelopes.len();
        for event in events {
            let seq = self.version() + 1;
            self.envelopes.push(EventEnvelope::new(
                Uuid::now_v7(),
                self.owner_id,
                self.aggregate_id,
                self.aggregate_type.clone(),
                seq,
                event,
            ));
        }
        &self.envelopes[start..]
    }

    pub fn envelopes(&self) -> &[EventEnvelope<E>] {
        &self.envelopes
    }

    /// Envelopes with a sequence number greater than `after`.
    pub fn since(&self, after: u64) -> &[EventEnvelope<E>] {
        let start = usize::try_from(after).unwrap_or(usize::MAX).min(self.envelopes.len());
        &self.envelopes[start..]
    }

    /// Feed every envelope to `projection`, oldest first.
    pub fn replay<P>(&self, projection: &mut P)
    where
        P: Projection<Ev = E>,
    {
        for env in &self.envelopes {
            projection.apply(env);
        }
    }

    pub fn into_envelopes(self) -> Vec<EventEnvelope<E>> {
        self.envelopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Ticked(i64);

    impl Event for Ticked {
        fn event_type(&self) -> &'static str {
            "test.ticked"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.0, 0).unwrap()
        }
    }

    #[derive(Default)]
    struct Sum {
        total: i64,
        seen: Vec<u64>,
    }

    impl Projection for Sum {
        type Ev = Ticked;

        fn apply(&mut self, envelope: &EventEnvelope<Ticked>) {
            self.total += envelope.payload().0;
            self.seen.push(envelope.sequence_number());
        }
    }

    fn stream() -> EventStream<Ticked> {
        EventStream::new(OwnerId::new(), AggregateId::new(), "test")
    }

    #[test]
    fn assigns_contiguous_sequence_numbers() {
        let mut s = stream();
        assert_eq!(s.version(), 0);

        let first = s.append([Ticked(1), Ticked(2)]);
        let seqs: Vec<u64> = first.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(seqs, vec![1, 2]);

        let owner = s.owner_id();
        let second = s.append([Ticked(3)]);
        assert_eq!(second[0].sequence_number(), 3);
        assert_eq!(second[0].owner_id(), owner);
        assert_eq!(s.version(), 3);
    }

    #[test]
    fn since_returns_the_tail() {
        let mut s = stream();
        s.append([Ticked(1), Ticked(2), Ticked(3)]);
        assert_eq!(s.since(0).len(), 3);
        assert_eq!(s.since(2)[0].payload(), &Ticked(3));
        assert!(s.since(3).is_empty());
        assert!(s.since(99).is_empty());
    }

    #[test]
    fn replay_feeds_projection_in_order() {
        let mut s = stream();
        s.append([Ticked(5), Ticked(7)]);

        let mut sum = Sum::default();
        s.replay(&mut sum);
        assert_eq!(sum.total, 12);
        assert_eq!(sum.seen, vec![1, 2]);
    }

    #[test]
    fn reload_checks_continuity() {
        let mut s = stream();
        s.append([Ticked(1), Ticked(2)]);
        let (owner, aggregate) = (s.owner_id(), s.aggregate_id());

        let reloaded = EventStream::from_envelopes(owner, aggregate, "test", s.envelopes().to_vec()).unwrap();
        assert_eq!(reloaded.version(), 2);

        let mut gapped = s.clone().into_envelopes();
        gapped.remove(0);
        assert!(matches!(
            EventStream::from_envelopes(owner, aggregate, "test", gapped),
            Err(DomainError::InvariantViolation(_))
        ));

        assert!(EventStream::from_envelopes(OwnerId::new(), aggregate, "test", s.into_envelopes()).is_err());
    }
}
