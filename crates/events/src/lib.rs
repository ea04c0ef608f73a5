//! Domain events and the read-model seam.
//!
//! Portfolio changes are recorded as append-only events; projections such as
//! the net-worth history are rebuilt from them.

pub mod envelope;
pub mod event;
pub mod projection;
pub mod stream;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use projection::Projection;
pub use stream::EventStream;
