use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{AggregateRoot, DomainError, DomainResult, OrderId, ValueObject};
use stockroom_inventory::StockDelta;

/// Direction of stock movement for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Incoming stock from a supplier.
    Purchase,
    /// Outgoing stock to a consumer.
    Dispense,
}

impl OrderType {
    /// Sign applied to line quantities when the order hits the ledger.
    pub fn sign(self) -> i64 {
        match self {
            OrderType::Purchase => 1,
            OrderType::Dispense => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Purchase => "purchase",
            OrderType::Dispense => "dispense",
        }
    }
}

impl core::fmt::Display for OrderType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status lifecycle: `Pending` moves once to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: one item and a strictly positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_name: String,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(item_name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        let item_name = item_name.into();
        if item_name.trim().is_empty() {
            return Err(DomainError::invalid_argument("order line item name cannot be empty"));
        }
        if quantity <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "order line quantity must be positive (got {quantity} for '{item_name}')"
            )));
        }
        Ok(Self {
            item_name,
            quantity,
        })
    }
}

impl ValueObject for OrderItem {}

/// Aggregate root: Order.
///
/// A record of intent to move stock. The order never touches the ledger
/// itself; see [`crate::processor`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_type: OrderType,
    creation_time: DateTime<Utc>,
    fulfillment_time: Option<DateTime<Utc>>,
    status: OrderStatus,
    items: Vec<OrderItem>,
    notes: String,
    version: u64,
}

impl Order {
    /// Create a pending order with no lines, stamped now.
    pub fn create(order_type: OrderType, notes: impl Into<String>) -> Self {
        Self::create_at(OrderId::new(), order_type, notes, Utc::now())
    }

    /// Create a pending order with an explicit id and creation time.
    pub fn create_at(
        id: OrderId,
        order_type: OrderType,
        notes: impl Into<String>,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_type,
            creation_time,
            fulfillment_time: None,
            status: OrderStatus::Pending,
            items: Vec::new(),
            notes: notes.into(),
            version: 0,
        }
    }

    /// Append a line. Only allowed while pending.
    pub fn add_item(&mut self, item_name: impl Into<String>, quantity: i64) -> DomainResult<()> {
        self.ensure_pending("add items to")?;
        let line = OrderItem::new(item_name, quantity)?;
        self.items.push(line);
        self.version += 1;
        Ok(())
    }

    /// Mark the order fulfilled and stamp the fulfillment time.
    ///
    /// The ledger is not touched here.
    pub fn fulfill(&mut self) -> DomainResult<()> {
        self.fulfill_at(Utc::now())
    }

    /// Like [`Order::fulfill`] with an explicit clock reading.
    ///
    /// The stamp is clamped so it never precedes `creation_time`.
    pub fn fulfill_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending("fulfil")?;
        self.status = OrderStatus::Fulfilled;
        self.fulfillment_time = Some(now.max(self.creation_time));
        self.version += 1;
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_pending("cancel")?;
        self.status = OrderStatus::Cancelled;
        self.version += 1;
        Ok(())
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn fulfillment_time(&self) -> Option<DateTime<Utc>> {
        self.fulfillment_time
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Independent copy of the lines; mutating it does not affect the order.
    pub fn items(&self) -> Vec<OrderItem> {
        self.items.clone()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Ledger deltas this order proposes, in line order.
    pub fn stock_deltas(&self) -> Vec<StockDelta> {
        let sign = self.order_type.sign();
        self.items
            .iter()
            .map(|line| StockDelta::new(line.item_name.clone(), sign * line.quantity))
            .collect()
    }

    /// Check a record that did not come through the constructors (e.g. storage).
    pub fn check_consistency(&self) -> DomainResult<()> {
        for line in &self.items {
            OrderItem::new(line.item_name.clone(), line.quantity)?;
        }
        match (self.status, self.fulfillment_time) {
            (OrderStatus::Fulfilled, None) => Err(DomainError::invalid_state(format!(
                "order {} is fulfilled but has no fulfillment time",
                self.id
            ))),
            (OrderStatus::Pending | OrderStatus::Cancelled, Some(_)) => {
                Err(DomainError::invalid_state(format!(
                    "order {} has a fulfillment time but is {}",
                    self.id, self.status
                )))
            }
            _ => Ok(()),
        }
    }

    fn ensure_pending(&self, action: &str) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state(format!(
                "cannot {action} order {} once {}",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pending_purchase() -> Order {
        Order::create(OrderType::Purchase, "restock")
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Fulfilled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn create_starts_pending_and_empty() {
        let order = pending_purchase();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.items().is_empty());
        assert_eq!(order.fulfillment_time(), None);
        assert_eq!(order.notes(), "restock");
        assert_eq!(order.version(), 0);
    }

    #[test]
    fn fresh_orders_get_distinct_ids() {
        assert_ne!(pending_purchase().id_typed(), pending_purchase().id_typed());
    }

    #[test]
    fn add_item_appends_in_order() {
        let mut order = pending_purchase();
        order.add_item("gauze", 100).unwrap();
        order.add_item("tape", 5).unwrap();

        let items = order.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], OrderItem::new("gauze", 100).unwrap());
        assert_eq!(items[1].item_name, "tape");
        assert_eq!(order.version(), 2);
    }

    #[test]
    fn add_item_rejects_non_positive_quantity() {
        let mut order = pending_purchase();
        for bad in [0, -3] {
            match order.add_item("gauze", bad).unwrap_err() {
                DomainError::InvalidArgument(msg) if msg.contains("positive") => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
        }
        assert_eq!(order.item_count(), 0);
    }

    #[test]
    fn items_returns_an_independent_copy() {
        let mut order = pending_purchase();
        order.add_item("gauze", 1).unwrap();

        let mut copy = order.items();
        copy.push(OrderItem::new("smuggled", 1).unwrap());
        copy[0].quantity = 999;

        assert_eq!(order.items(), vec![OrderItem::new("gauze", 1).unwrap()]);
    }

    #[test]
    fn fulfill_sets_status_and_time() {
        let mut order = pending_purchase();
        order.fulfill().unwrap();

        assert_eq!(order.status(), OrderStatus::Fulfilled);
        let at = order.fulfillment_time().expect("fulfillment time set");
        assert!(at >= order.creation_time());
    }

    #[test]
    fn fulfill_time_never_precedes_creation() {
        let mut order = pending_purchase();
        let earlier = order.creation_time() - Duration::seconds(30);
        order.fulfill_at(earlier).unwrap();
        assert_eq!(order.fulfillment_time(), Some(order.creation_time()));
    }

    #[test]
    fn cancel_leaves_fulfillment_time_absent() {
        let mut order = pending_purchase();
        order.cancel().unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(order.fulfillment_time(), None);
    }

    #[test]
    fn terminal_orders_reject_every_transition() {
        let mut fulfilled = pending_purchase();
        fulfilled.fulfill().unwrap();
        let mut cancelled = pending_purchase();
        cancelled.cancel().unwrap();

        for (order, expected) in [
            (&mut fulfilled, OrderStatus::Fulfilled),
            (&mut cancelled, OrderStatus::Cancelled),
        ] {
            let version = order.version();
            assert!(matches!(order.fulfill(), Err(DomainError::InvalidState(_))));
            assert!(matches!(order.cancel(), Err(DomainError::InvalidState(_))));
            assert!(matches!(
                order.add_item("gauze", 1),
                Err(DomainError::InvalidState(_))
            ));
            assert_eq!(order.status(), expected);
            assert_eq!(order.version(), version);
        }
    }

    #[test]
    fn dispense_deltas_are_negative() {
        let mut order = Order::create(OrderType::Dispense, "");
        order.add_item("tape", 5).unwrap();
        order.add_item("gauze", 2).unwrap();

        assert_eq!(
            order.stock_deltas(),
            vec![StockDelta::new("tape", -5), StockDelta::new("gauze", -2)]
        );
    }

    #[test]
    fn serialized_record_round_trips_and_stays_consistent() {
        let mut order = pending_purchase();
        order.add_item("gauze", 100).unwrap();
        order.fulfill().unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "fulfilled");
        assert_eq!(json["order_type"], "purchase");

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
        back.check_consistency().unwrap();
    }

    #[test]
    fn consistency_check_rejects_fulfilled_without_time() {
        let order = pending_purchase();
        let mut json = serde_json::to_value(&order).unwrap();
        json["status"] = "fulfilled".into();

        let tampered: Order = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tampered.check_consistency(),
            Err(DomainError::InvalidState(_))
        ));
    }
}
