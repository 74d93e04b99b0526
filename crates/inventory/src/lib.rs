//! Inventory domain module: the item ledger.
//!
//! This crate holds the single source of truth for on-hand stock, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod ledger;

pub use ledger::{Item, ItemLedger, StockDelta};
