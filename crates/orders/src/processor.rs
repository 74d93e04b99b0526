//! Order processor: validates an order against the ledger and applies it.
//!
//! Application is split in two passes:
//!
//! 1. **Plan** (`plan`): check the lifecycle precondition and simulate every
//!    line against the ledger without mutating anything. The result is a
//!    [`FulfillmentPlan`] holding the buffered deltas and the resulting state
//!    of each touched item.
//! 2. **Commit** (`commit`): write the buffered deltas in one step and freeze
//!    the order as fulfilled.
//!
//! A successful plan makes the commit infallible for the same ledger, so an
//! order is never half-applied. Callers that must persist before mutating
//! (the command layer) run the two passes separately; everyone else calls
//! [`apply_order`].

use stockroom_core::{DomainError, DomainResult, OrderId};
use stockroom_inventory::{Item, ItemLedger, StockDelta};

use crate::order::Order;

/// Validated, buffered ledger effects of one pending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentPlan {
    order_id: OrderId,
    deltas: Vec<StockDelta>,
    resulting: Vec<Item>,
}

impl FulfillmentPlan {
    pub fn deltas(&self) -> &[StockDelta] {
        &self.deltas
    }

    /// Post-commit state of every item the order touches (quantity 0 when
    /// the item is depleted), in first-touch order.
    pub fn resulting_items(&self) -> &[Item] {
        &self.resulting
    }
}

/// Validation pass. Mutates nothing.
///
/// Fails with `InvalidState` unless the order is pending, and with
/// `InsufficientStock` naming the first dispense line the ledger cannot cover.
/// Lines on the same item are checked cumulatively, which supersedes a
/// per-line `ItemLedger::has_sufficient_stock` check. An order without lines
/// plans to no ledger effects.
pub fn plan(order: &Order, ledger: &ItemLedger) -> DomainResult<FulfillmentPlan> {
    if !order.is_pending() {
        return Err(DomainError::invalid_state(format!(
            "cannot fulfil order {} once {}",
            order.id_typed(),
            order.status()
        )));
    }
    let deltas = order.stock_deltas();
    let resulting = ledger.preview(&deltas)?;

    Ok(FulfillmentPlan {
        order_id: order.id_typed(),
        deltas,
        resulting,
    })
}

/// Apply a plan produced by [`plan`] for this order and this ledger.
///
/// Refuses (without mutating) a plan that belongs to another order or that no
/// longer matches the ledger.
pub fn commit(plan: &FulfillmentPlan, order: &mut Order, ledger: &mut ItemLedger) -> DomainResult<()> {
    if plan.order_id != order.id_typed() {
        return Err(DomainError::invalid_state(format!(
            "fulfillment plan for order {} applied to order {}",
            plan.order_id,
            order.id_typed()
        )));
    }
    if !order.is_pending() {
        return Err(DomainError::invalid_state(format!(
            "cannot fulfil order {} once {}",
            order.id_typed(),
            order.status()
        )));
    }
    if ledger.preview(&plan.deltas)? != plan.resulting {
        return Err(DomainError::invalid_state(format!(
            "ledger changed since order {} was validated",
            plan.order_id
        )));
    }

    ledger.apply_batch(&plan.deltas)?;
    order.fulfill()
}

/// Validate, apply and fulfil in one call.
///
/// On error neither the ledger nor the order has changed.
pub fn apply_order(order: &mut Order, ledger: &mut ItemLedger) -> DomainResult<FulfillmentPlan> {
    let plan = plan(order, ledger)?;
    commit(&plan, order, ledger)?;
    Ok(plan)
}
