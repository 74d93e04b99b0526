use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ValueObject};

/// A named stock line and its on-hand quantity.
///
/// The name is the identity key. A quantity of zero means "no stock"; the
/// ledger never keeps such entries, but storage adapters receive them to learn
/// that an item was depleted or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}

impl Entity for Item {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

/// A signed change to one item's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDelta {
    pub name: String,
    pub delta: i64,
}

impl StockDelta {
    pub fn new(name: impl Into<String>, delta: i64) -> Self {
        Self {
            name: name.into(),
            delta,
        }
    }

    /// Positive delta for `quantity` incoming units.
    pub fn addition(name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        ensure_positive(quantity)?;
        Ok(Self::new(name, quantity))
    }

    /// Negative delta for `quantity` outgoing units.
    pub fn removal(name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        ensure_positive(quantity)?;
        Ok(Self::new(name, -quantity))
    }
}

impl ValueObject for StockDelta {}

/// Mapping from item name to non-negative quantity.
///
/// Invariants:
/// - every stored quantity is strictly positive (depleted entries are pruned);
/// - unknown names read as quantity 0;
/// - a mutation either applies completely or leaves the map untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLedger {
    items: HashMap<String, i64>,
}

impl ItemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted items.
    ///
    /// Zero-quantity records are skipped and duplicate names are summed.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> DomainResult<Self> {
        let mut ledger = Self::new();
        for item in items {
            ensure_name(&item.name)?;
            if item.quantity < 0 {
                return Err(DomainError::invalid_argument(format!(
                    "stored quantity for '{}' is negative ({})",
                    item.name, item.quantity
                )));
            }
            if item.quantity > 0 {
                ledger.apply_delta(&item.name, item.quantity)?;
            }
        }
        Ok(ledger)
    }

    /// Increase the named entry by `quantity`, creating it if absent.
    pub fn add_item(&mut self, name: &str, quantity: i64) -> DomainResult<Item> {
        let delta = StockDelta::addition(name, quantity)?;
        self.apply_delta(&delta.name, delta.delta)
    }

    /// Decrease the named entry by `quantity`.
    ///
    /// Fails with `InsufficientStock` (and no change) if fewer than `quantity`
    /// units are on hand. The returned item has quantity 0 once depleted.
    pub fn remove_item(&mut self, name: &str, quantity: i64) -> DomainResult<Item> {
        let delta = StockDelta::removal(name, quantity)?;
        self.apply_delta(&delta.name, delta.delta)
    }

    /// Remove the whole entry, returning what it held.
    pub fn delete_item(&mut self, name: &str) -> DomainResult<Item> {
        ensure_name(name)?;
        self.items
            .remove_entry(name)
            .map(|(name, quantity)| Item { name, quantity })
            .ok_or_else(|| DomainError::not_found(format!("item '{name}'")))
    }

    pub fn get_quantity(&self, name: &str) -> i64 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has_sufficient_stock(&self, name: &str, quantity: i64) -> bool {
        self.get_quantity(name) >= quantity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of every entry, sorted by name.
    pub fn items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .map(|(name, quantity)| Item::new(name.clone(), *quantity))
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Apply one signed delta atomically.
    pub fn apply_delta(&mut self, name: &str, delta: i64) -> DomainResult<Item> {
        let item = self.preview_delta(&StockDelta::new(name, delta))?;
        self.write(&item.name, item.quantity);
        Ok(item)
    }

    /// Resulting state of one item if `delta` were applied. Mutates nothing.
    pub fn preview_delta(&self, delta: &StockDelta) -> DomainResult<Item> {
        ensure_name(&delta.name)?;
        let current = self.get_quantity(&delta.name);
        let next = next_quantity(&delta.name, current, delta.delta)?;
        Ok(Item::new(delta.name.clone(), next))
    }

    /// Compute the outcome of applying `deltas` in order without mutating.
    ///
    /// Deltas on the same name are accumulated, so a batch that passes
    /// `preview` is guaranteed to pass `apply_batch` on the same ledger. The
    /// first failing delta is reported. Returns the resulting state of every
    /// touched item in first-touch order.
    pub fn preview(&self, deltas: &[StockDelta]) -> DomainResult<Vec<Item>> {
        let mut touched: Vec<Item> = Vec::new();
        for d in deltas {
            ensure_name(&d.name)?;
            let slot = match touched.iter().position(|i| i.name == d.name) {
                Some(idx) => idx,
                None => {
                    touched.push(Item::new(d.name.clone(), self.get_quantity(&d.name)));
                    touched.len() - 1
                }
            };
            let current = touched[slot].quantity;
            touched[slot].quantity = next_quantity(&d.name, current, d.delta)?;
        }
        Ok(touched)
    }

    /// Apply `deltas` in order as one step: all of them or none.
    pub fn apply_batch(&mut self, deltas: &[StockDelta]) -> DomainResult<Vec<Item>> {
        let resulting = self.preview(deltas)?;
        for item in &resulting {
            self.write(&item.name, item.quantity);
        }
        Ok(resulting)
    }

    fn write(&mut self, name: &str, quantity: i64) {
        if quantity == 0 {
            self.items.remove(name);
        } else {
            self.items.insert(name.to_string(), quantity);
        }
    }
}

fn next_quantity(name: &str, current: i64, delta: i64) -> DomainResult<i64> {
    if delta == 0 {
        return Err(DomainError::invalid_argument("delta cannot be zero"));
    }
    let next = current
        .checked_add(delta)
        .ok_or_else(|| DomainError::invalid_argument(format!("quantity overflow for '{name}'")))?;
    if next < 0 {
        return Err(DomainError::insufficient_stock(name, delta.saturating_neg(), current));
    }
    Ok(next)
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::invalid_argument(format!(
            "quantity must be positive (got {quantity})"
        )));
    }
    Ok(())
}

fn ensure_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid_argument("item name cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger_with(entries: &[(&str, i64)]) -> ItemLedger {
        let mut ledger = ItemLedger::new();
        for (name, qty) in entries {
            ledger.add_item(name, *qty).unwrap();
        }
        ledger
    }

    #[test]
    fn unknown_item_reads_as_zero() {
        let ledger = ItemLedger::new();
        assert_eq!(ledger.get_quantity("nothing"), 0);
        assert!(!ledger.contains("nothing"));
    }

    #[test]
    fn add_creates_then_accumulates() {
        let mut ledger = ItemLedger::new();
        assert_eq!(ledger.add_item("gauze", 4).unwrap(), Item::new("gauze", 4));
        assert_eq!(ledger.add_item("gauze", 6).unwrap(), Item::new("gauze", 10));
        assert_eq!(ledger.get_quantity("gauze"), 10);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn non_positive_quantities_are_rejected_without_mutation() {
        let mut ledger = ledger_with(&[("gauze", 3)]);

        for bad in [0, -1] {
            match ledger.add_item("gauze", bad).unwrap_err() {
                DomainError::InvalidArgument(msg) if msg.contains("positive") => {}
                other => panic!("expected InvalidArgument, got {other:?}"),
            }
            assert!(matches!(
                ledger.remove_item("gauze", bad),
                Err(DomainError::InvalidArgument(_))
            ));
        }
        assert_eq!(ledger.get_quantity("gauze"), 3);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut ledger = ItemLedger::new();
        assert!(matches!(
            ledger.add_item("  ", 1),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn over_removal_fails_and_leaves_quantity() {
        let mut ledger = ledger_with(&[("tape", 5)]);
        let err = ledger.remove_item("tape", 6).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("tape", 6, 5));
        assert_eq!(err.shortfall(), Some(1));
        assert_eq!(ledger.get_quantity("tape"), 5);
    }

    #[test]
    fn full_removal_prunes_the_entry() {
        let mut ledger = ledger_with(&[("widget", 10)]);
        let item = ledger.remove_item("widget", 10).unwrap();
        assert!(item.is_depleted());
        assert_eq!(ledger.get_quantity("widget"), 0);
        assert!(!ledger.contains("widget"));
        assert!(ledger.items().is_empty());
    }

    #[test]
    fn overflow_is_rejected() {
        let mut ledger = ledger_with(&[("bolts", i64::MAX)]);
        match ledger.add_item("bolts", 1).unwrap_err() {
            DomainError::InvalidArgument(msg) if msg.contains("overflow") => {}
            other => panic!("expected overflow rejection, got {other:?}"),
        }
        assert_eq!(ledger.get_quantity("bolts"), i64::MAX);
    }

    #[test]
    fn delete_removes_whole_entry() {
        let mut ledger = ledger_with(&[("mask", 7), ("glove", 2)]);
        assert_eq!(ledger.delete_item("mask").unwrap(), Item::new("mask", 7));
        assert_eq!(ledger.get_quantity("mask"), 0);
        assert_eq!(ledger.get_quantity("glove"), 2);

        assert!(matches!(
            ledger.delete_item("mask"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn items_are_sorted_by_name() {
        let ledger = ledger_with(&[("zinc", 1), ("aspirin", 2), ("mask", 3)]);
        let names: Vec<String> = ledger.items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["aspirin", "mask", "zinc"]);
    }

    #[test]
    fn preview_delta_does_not_mutate() {
        let ledger = ledger_with(&[("tape", 5)]);
        let removal = StockDelta::removal("tape", 2).unwrap();
        assert_eq!(ledger.preview_delta(&removal).unwrap(), Item::new("tape", 3));
        assert_eq!(ledger.get_quantity("tape"), 5);
    }

    #[test]
    fn delta_constructors_validate_quantity() {
        assert_eq!(StockDelta::removal("a", 4).unwrap(), StockDelta::new("a", -4));
        assert!(StockDelta::addition("a", 0).is_err());
        assert!(StockDelta::removal("a", -4).is_err());
    }

    #[test]
    fn sufficient_stock_predicate() {
        let ledger = ledger_with(&[("tape", 5)]);
        assert!(ledger.has_sufficient_stock("tape", 5));
        assert!(!ledger.has_sufficient_stock("tape", 6));
        assert!(!ledger.has_sufficient_stock("absent", 1));
    }

    #[test]
    fn from_items_skips_zero_and_sums_duplicates() {
        let ledger = ItemLedger::from_items(vec![
            Item::new("a", 2),
            Item::new("b", 0),
            Item::new("a", 3),
        ])
        .unwrap();
        assert_eq!(ledger.get_quantity("a"), 5);
        assert!(!ledger.contains("b"));
    }

    #[test]
    fn from_items_rejects_negative_records() {
        let err = ItemLedger::from_items(vec![Item::new("a", -1)]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn batch_accumulates_deltas_on_the_same_name() {
        let mut ledger = ledger_with(&[("a", 5)]);
        let deltas = vec![StockDelta::new("a", -3), StockDelta::new("a", -3)];

        let err = ledger.apply_batch(&deltas).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("a", 3, 2));
        assert_eq!(ledger.get_quantity("a"), 5);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let mut ledger = ledger_with(&[("a", 5)]);
        let deltas = vec![StockDelta::new("a", -3), StockDelta::new("b", -2)];

        let err = ledger.apply_batch(&deltas).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("b", 2, 0));
        assert_eq!(ledger.get_quantity("a"), 5);
    }

    #[test]
    fn batch_reports_touched_items_in_first_touch_order() {
        let mut ledger = ledger_with(&[("a", 5)]);
        let deltas = vec![
            StockDelta::new("b", 4),
            StockDelta::new("a", -5),
            StockDelta::new("b", 1),
        ];

        let resulting = ledger.apply_batch(&deltas).unwrap();
        assert_eq!(resulting, vec![Item::new("b", 5), Item::new("a", 0)]);
        assert_eq!(ledger.get_quantity("b"), 5);
        assert!(!ledger.contains("a"));
    }

    #[test]
    fn item_serializes_with_plain_fields() {
        let json = serde_json::to_value(Item::new("gauze", 3)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "gauze", "quantity": 3 }));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any sequence of additions sums to the final quantity.
        #[test]
        fn additions_sum_to_quantity(amounts in prop::collection::vec(1i64..1_000_000i64, 1..20)) {
            let mut ledger = ItemLedger::new();
            for amount in &amounts {
                ledger.add_item("n", *amount).unwrap();
            }
            prop_assert_eq!(ledger.get_quantity("n"), amounts.iter().sum::<i64>());
        }

        /// Property: removing one more than on hand always fails and changes nothing.
        #[test]
        fn removing_past_zero_is_rejected(q in 0i64..1_000_000i64) {
            let mut ledger = ItemLedger::new();
            if q > 0 {
                ledger.add_item("n", q).unwrap();
            }
            let err = ledger.remove_item("n", q + 1).unwrap_err();
            prop_assert_eq!(err, DomainError::insufficient_stock("n", q + 1, q));
            prop_assert_eq!(ledger.get_quantity("n"), q);
        }

        /// Property: stored quantities never go negative under mixed deltas.
        #[test]
        fn quantities_stay_non_negative(deltas in prop::collection::vec(-50i64..50i64, 1..40)) {
            let mut ledger = ItemLedger::new();
            for delta in deltas {
                let before = ledger.get_quantity("n");
                match ledger.apply_delta("n", delta) {
                    Ok(item) => prop_assert_eq!(item.quantity, before + delta),
                    Err(_) => prop_assert_eq!(ledger.get_quantity("n"), before),
                }
                prop_assert!(ledger.get_quantity("n") >= 0);
            }
        }
    }
}
