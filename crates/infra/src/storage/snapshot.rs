use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{AggregateRoot, Entity};
use stockroom_inventory::Item;
use stockroom_orders::Order;

use super::r#trait::StorageError;

/// Current on-disk layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Full stored state: items by name and order records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    #[serde(default)]
    pub items: BTreeMap<String, i64>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            items: BTreeMap::new(),
            orders: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn put_item(&mut self, item: &Item) -> Result<(), StorageError> {
        if item.quantity < 0 {
            return Err(StorageError::Corrupt(format!(
                "refusing to store negative quantity for '{}'",
                item.name
            )));
        }
        if item.is_depleted() {
            self.items.remove(item.id());
        } else {
            self.items.insert(item.id().clone(), item.quantity);
        }
        Ok(())
    }

    pub fn put_order(&mut self, order: &Order) {
        match self.orders.iter_mut().find(|o| o.id() == order.id()) {
            Some(slot) => *slot = order.clone(),
            None => self.orders.push(order.clone()),
        }
    }

    pub fn items(&self) -> Vec<Item> {
        self.items
            .iter()
            .map(|(name, quantity)| Item::new(name.clone(), *quantity))
            .collect()
    }

    pub fn check_format(&self) -> Result<(), StorageError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StorageError::Corrupt(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        Ok(())
    }
}
