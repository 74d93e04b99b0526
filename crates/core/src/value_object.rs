//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. An
/// order line `("gauze", 100)` is a value object: it has no identity of its
/// own and only exists inside the order that owns it.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Line {
///     item_name: String,
///     quantity: i64,
/// }
///
/// impl ValueObject for Line {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
