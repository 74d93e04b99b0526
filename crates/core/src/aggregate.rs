//! Aggregate root trait for records with a lifecycle.

/// Aggregate root marker + minimal interface.
///
/// An aggregate root owns its children exclusively (an order owns its line
/// items) and is the only way to mutate them. Every accepted mutation bumps
/// `version()` by one.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of accepted mutations since creation.
    fn version(&self) -> u64;
}
