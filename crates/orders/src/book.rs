use std::collections::HashMap;

use stockroom_core::{DomainError, DomainResult, OrderId};

use crate::order::{Order, OrderStatus};

/// In-memory collection of every known order, keyed by id.
///
/// The book never deletes an order; retention is up to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    orders: HashMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the book from persisted records, checking each one.
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> DomainResult<Self> {
        let mut book = Self::new();
        for order in orders {
            order.check_consistency()?;
            book.insert(order)?;
        }
        Ok(book)
    }

    pub fn insert(&mut self, order: Order) -> DomainResult<()> {
        let id = order.id_typed();
        if self.orders.contains_key(&id) {
            return Err(DomainError::invalid_argument(format!(
                "order {id} already exists"
            )));
        }
        self.orders.insert(id, order);
        Ok(())
    }

    pub fn get(&self, id: OrderId) -> DomainResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))
    }

    /// Swap in a new state for an existing order, returning the previous one.
    pub fn replace(&mut self, order: Order) -> DomainResult<Order> {
        let id = order.id_typed();
        match self.orders.get_mut(&id) {
            Some(slot) => Ok(std::mem::replace(slot, order)),
            None => Err(DomainError::not_found(format!("order {id}"))),
        }
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by_key(|o| (o.creation_time(), o.id_typed().to_string()));
        orders
    }

    /// Orders in `status`, oldest first.
    pub fn with_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders()
            .into_iter()
            .filter(|o| o.status() == status)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
