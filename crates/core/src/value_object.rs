//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two net-worth
/// totals with the same figures are the same totals, whereas two assets with
/// the same value are still distinct holdings (see [`crate::Entity`]).
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
