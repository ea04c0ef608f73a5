use crate::{Event, EventEnvelope};

/// A projection builds a read model from an append-only event stream.
///
/// Read models are disposable: they can be dropped and rebuilt by replaying
/// the stream from the first event.
///
/// ## Idempotency
///
/// Events may be delivered more than once (replay, at-least-once delivery).
/// Applying an envelope that was already seen must not change the read model;
/// the usual strategy is to track the last applied `sequence_number`.
///
/// ## Error Handling
///
/// `apply` does not return errors. Implementations that can fail expose a
/// fallible inherent method and make `apply` log and skip.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the read model.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);
}
