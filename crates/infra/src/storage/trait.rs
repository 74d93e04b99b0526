use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::Item;
use stockroom_orders::Order;

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors. A failed
/// save must leave the previously stored state intact.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt storage: {0}")]
    Corrupt(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of the item ledger and order records.
///
/// ## Save Semantics
///
/// - `save_item` records the current state of one item. A quantity of 0 means
///   the item no longer has stock and is dropped from storage.
/// - `save_order` records one order together with the current state of every
///   item it touched. Both are written in a single atomic step, so a fulfilled
///   order is never persisted without its stock effects (or vice versa).
///
/// ## Load Semantics
///
/// - `load_items` returns every stored item with positive quantity.
/// - `load_orders` returns every stored order in the state last saved.
/// - Missing storage loads as empty.
pub trait Storage: Send + Sync {
    fn save_item(&self, item: &Item) -> Result<(), StorageError>;

    fn save_order(&self, order: &Order, touched: &[Item]) -> Result<(), StorageError>;

    fn load_items(&self) -> Result<Vec<Item>, StorageError>;

    fn load_orders(&self) -> Result<Vec<Order>, StorageError>;
}

impl<S> Storage for Arc<S>
where
    S: Storage + ?Sized,
{
    fn save_item(&self, item: &Item) -> Result<(), StorageError> {
        (**self).save_item(item)
    }

    fn save_order(&self, order: &Order, touched: &[Item]) -> Result<(), StorageError> {
        (**self).save_order(order, touched)
    }

    fn load_items(&self) -> Result<Vec<Item>, StorageError> {
        (**self).load_items()
    }

    fn load_orders(&self) -> Result<Vec<Order>, StorageError> {
        (**self).load_orders()
    }
}
