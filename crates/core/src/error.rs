//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is deterministic given unchanged state and recoverable by the
/// caller. An operation that returns one of these has not mutated the ledger or
/// any order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An argument failed validation (non-positive quantity, empty name,
    /// malformed order line, arithmetic overflow).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A removal or dispense would drive stock below zero.
    #[error(
        "insufficient stock for '{item}': requested {requested}, available {available} (short by {})",
        .requested - .available
    )]
    InsufficientStock {
        item: String,
        requested: i64,
        available: i64,
    },

    /// An operation was attempted on a record in the wrong lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn insufficient_stock(item: impl Into<String>, requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            item: item.into(),
            requested,
            available,
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Missing quantity for an `InsufficientStock` error, `None` otherwise.
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            Self::InsufficientStock {
                requested,
                available,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}
