use std::sync::RwLock;

use stockroom_inventory::Item;
use stockroom_orders::Order;

use super::r#trait::{Storage, StorageError};
use super::snapshot::Snapshot;

#[derive(Debug, Default)]
struct State {
    snapshot: Snapshot,
    save_calls: usize,
    unavailable: bool,
}

/// In-memory storage.
///
/// Intended for tests/dev. Counts save calls and can be switched to fail every
/// write, to exercise the command layer's failure path.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with items, as if saved by an earlier run.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Result<Self, StorageError> {
        let storage = Self::new();
        for item in items {
            storage.save_item(&item)?;
        }
        storage.reset_save_calls()?;
        Ok(storage)
    }

    /// Number of successful save calls so far.
    pub fn save_calls(&self) -> usize {
        self.state.read().map(|s| s.save_calls).unwrap_or(0)
    }

    pub fn reset_save_calls(&self) -> Result<(), StorageError> {
        self.write_state()?.save_calls = 0;
        Ok(())
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) -> Result<(), StorageError> {
        self.write_state()?.unavailable = unavailable;
        Ok(())
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StorageError> {
        self.state
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StorageError> {
        self.state
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }

    fn write_with(
        &self,
        change: impl FnOnce(&mut Snapshot) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let mut state = self.write_state()?;
        if state.unavailable {
            return Err(StorageError::Unavailable("storage switched off".to_string()));
        }

        // Stage on a copy so a failed change leaves stored state intact.
        let mut staged = state.snapshot.clone();
        change(&mut staged)?;
        state.snapshot = staged;
        state.save_calls += 1;
        Ok(())
    }
}

impl Storage for InMemoryStorage {
    fn save_item(&self, item: &Item) -> Result<(), StorageError> {
        self.write_with(|snapshot| snapshot.put_item(item))
    }

    fn save_order(&self, order: &Order, touched: &[Item]) -> Result<(), StorageError> {
        self.write_with(|snapshot| {
            for item in touched {
                snapshot.put_item(item)?;
            }
            snapshot.put_order(order);
            Ok(())
        })
    }

    fn load_items(&self) -> Result<Vec<Item>, StorageError> {
        Ok(self.read_state()?.snapshot.items())
    }

    fn load_orders(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.read_state()?.snapshot.orders.clone())
    }
}
