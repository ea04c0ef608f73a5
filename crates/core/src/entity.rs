//! Entity trait: identity that survives edits.

use chrono::{DateTime, Utc};

/// An object whose identity is stable while its attributes change.
///
/// An asset keeps its id when it is revalued; two assets with the same value
/// are still different holdings.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Time of the last mutation.
    fn last_updated(&self) -> DateTime<Utc>;
}
