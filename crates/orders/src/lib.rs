//! Orders domain module: purchase and dispense orders, their lifecycle, and
//! the processor that applies them to the item ledger.
//!
//! Pure domain logic (no IO, no storage).

pub mod book;
pub mod order;
pub mod processor;

pub use book::OrderBook;
pub use order::{Order, OrderItem, OrderStatus, OrderType};
pub use processor::{FulfillmentPlan, apply_order, commit, plan};
