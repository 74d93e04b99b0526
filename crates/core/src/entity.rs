//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Ledger items are entities keyed by name: two records with the same name
/// describe the same stock line even when their quantities differ.
pub trait Entity {
    /// Identity key of the entity.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
