use stockroom_infra::Storage;
use stockroom_inventory::ItemLedger;
use stockroom_orders::OrderBook;

use crate::command::CommandError;

/// Process-local state the commands operate on: the item ledger and every
/// known order.
///
/// Owned by the caller and lent to one command at a time by `&mut`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub(crate) items: ItemLedger,
    pub(crate) orders: OrderBook,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from storage (startup).
    pub fn load<S>(storage: &S) -> Result<Self, CommandError>
    where
        S: Storage + ?Sized,
    {
        let items = ItemLedger::from_items(storage.load_items()?)?;
        let orders = OrderBook::from_orders(storage.load_orders()?)?;
        tracing::info!(items = items.len(), orders = orders.len(), "inventory loaded");
        Ok(Self { items, orders })
    }

    pub fn items(&self) -> &ItemLedger {
        &self.items
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }
}
