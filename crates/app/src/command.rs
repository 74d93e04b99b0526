//! Operator commands.
//!
//! Every command follows the same contract:
//!
//! ```text
//! Command
//!   ↓
//! 1. Stage: validate and compute the new item/order state (no mutation)
//!   ↓
//! 2. Persist: exactly one storage call (mutating commands only)
//!   ↓
//! 3. Commit: swap the staged state into the in-memory inventory
//! ```
//!
//! A domain rejection stops at step 1 and a storage failure stops at step 2;
//! either way the ledger and the order book are exactly as before the call.

use thiserror::Error;

use stockroom_core::{DomainError, OrderId};
use stockroom_infra::{Storage, StorageError};
use stockroom_inventory::{Item, StockDelta};
use stockroom_orders::{Order, OrderStatus, OrderType, processor};

use crate::help::help_text;
use crate::inventory::Inventory;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A request built by the (external) parser from already-typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddItem {
        name: String,
        quantity: i64,
    },
    /// Remove `quantity` units, or the whole entry when `quantity` is `None`.
    DeleteItem {
        name: String,
        quantity: Option<i64>,
    },
    List,
    ListOrders {
        status: Option<OrderStatus>,
    },
    Help {
        topic: Option<String>,
    },
    CreateOrder {
        order_type: OrderType,
        items: Vec<(String, i64)>,
        notes: String,
    },
    FulfillOrder {
        order_id: OrderId,
    },
    CancelOrder {
        order_id: OrderId,
    },
    Exit,
}

/// What a successful command produced, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// New state of the item (quantity 0 once depleted or deleted).
    ItemUpdated(Item),
    Items(Vec<Item>),
    Orders(Vec<Order>),
    Help(String),
    OrderCreated(OrderId),
    OrderFulfilled {
        order_id: OrderId,
        items: Vec<Item>,
    },
    OrderCancelled(OrderId),
    Exit,
}

impl Command {
    /// Whether the REPL should stop after this command.
    pub fn is_exit(&self) -> bool {
        matches!(self, Command::Exit)
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::AddItem { .. }
                | Command::DeleteItem { .. }
                | Command::CreateOrder { .. }
                | Command::FulfillOrder { .. }
                | Command::CancelOrder { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddItem { .. } => "add",
            Command::DeleteItem { .. } => "delete",
            Command::List => "list",
            Command::ListOrders { .. } => "orders",
            Command::Help { .. } => "help",
            Command::CreateOrder { .. } => "order",
            Command::FulfillOrder { .. } => "fulfill",
            Command::CancelOrder { .. } => "cancel",
            Command::Exit => "exit",
        }
    }

    /// Run the command against `inventory`, persisting through `storage`.
    ///
    /// Mutating commands issue exactly one storage call on success. On error
    /// `inventory` is unchanged.
    pub fn execute<S>(
        &self,
        inventory: &mut Inventory,
        storage: &S,
    ) -> Result<CommandOutput, CommandError>
    where
        S: Storage + ?Sized,
    {
        let result = self.run(inventory, storage);
        match &result {
            Ok(_) if self.is_mutating() => {
                tracing::info!(command = self.name(), "command applied");
            }
            Ok(_) => tracing::debug!(command = self.name(), "command executed"),
            Err(err) => tracing::warn!(command = self.name(), error = %err, "command rejected"),
        }
        result
    }

    fn run<S>(&self, inventory: &mut Inventory, storage: &S) -> Result<CommandOutput, CommandError>
    where
        S: Storage + ?Sized,
    {
        match self {
            Command::AddItem { name, quantity } => {
                let delta = StockDelta::addition(name.as_str(), *quantity)?;
                apply_item_delta(inventory, storage, &delta)
            }
            Command::DeleteItem {
                name,
                quantity: Some(quantity),
            } => {
                let delta = StockDelta::removal(name.as_str(), *quantity)?;
                apply_item_delta(inventory, storage, &delta)
            }
            Command::DeleteItem {
                name,
                quantity: None,
            } => {
                if name.trim().is_empty() {
                    return Err(DomainError::invalid_argument("item name cannot be empty").into());
                }
                if !inventory.items.contains(name) {
                    return Err(DomainError::not_found(format!("item '{name}'")).into());
                }
                let cleared = Item::new(name.as_str(), 0);
                storage.save_item(&cleared)?;
                inventory.items.delete_item(name)?;
                Ok(CommandOutput::ItemUpdated(cleared))
            }
            Command::List => Ok(CommandOutput::Items(inventory.items.items())),
            Command::ListOrders { status } => {
                let orders = match status {
                    Some(status) => inventory.orders.with_status(*status),
                    None => inventory.orders.orders(),
                };
                Ok(CommandOutput::Orders(orders.into_iter().cloned().collect()))
            }
            Command::Help { topic } => Ok(CommandOutput::Help(help_text(topic.as_deref()))),
            Command::CreateOrder {
                order_type,
                items,
                notes,
            } => create_order(inventory, storage, *order_type, items, notes),
            Command::FulfillOrder { order_id } => fulfill_order(inventory, storage, *order_id),
            Command::CancelOrder { order_id } => {
                let mut cancelled = inventory.orders.get(*order_id)?.clone();
                cancelled.cancel()?;
                storage.save_order(&cancelled, &[])?;
                inventory.orders.replace(cancelled)?;
                Ok(CommandOutput::OrderCancelled(*order_id))
            }
            Command::Exit => Ok(CommandOutput::Exit),
        }
    }
}

fn apply_item_delta<S>(
    inventory: &mut Inventory,
    storage: &S,
    delta: &StockDelta,
) -> Result<CommandOutput, CommandError>
where
    S: Storage + ?Sized,
{
    let item = inventory.items.preview_delta(delta)?;
    storage.save_item(&item)?;
    inventory.items.apply_delta(&delta.name, delta.delta)?;
    Ok(CommandOutput::ItemUpdated(item))
}

fn create_order<S>(
    inventory: &mut Inventory,
    storage: &S,
    order_type: OrderType,
    lines: &[(String, i64)],
    notes: &str,
) -> Result<CommandOutput, CommandError>
where
    S: Storage + ?Sized,
{
    if lines.is_empty() {
        return Err(DomainError::invalid_argument("an order needs at least one line").into());
    }

    let mut order = Order::create(order_type, notes);
    for (name, quantity) in lines {
        order.add_item(name.as_str(), *quantity)?;
    }

    let order_id = order.id_typed();
    storage.save_order(&order, &[])?;
    inventory.orders.insert(order)?;
    tracing::debug!(%order_id, %order_type, lines = lines.len(), "order recorded");
    Ok(CommandOutput::OrderCreated(order_id))
}

fn fulfill_order<S>(
    inventory: &mut Inventory,
    storage: &S,
    order_id: OrderId,
) -> Result<CommandOutput, CommandError>
where
    S: Storage + ?Sized,
{
    let pending = inventory.orders.get(order_id)?;
    let plan = processor::plan(pending, &inventory.items)?;

    let mut staged = inventory.items.clone();
    let mut fulfilled = pending.clone();
    processor::commit(&plan, &mut fulfilled, &mut staged)?;

    storage.save_order(&fulfilled, plan.resulting_items())?;

    inventory.items = staged;
    inventory.orders.replace(fulfilled)?;

    Ok(CommandOutput::OrderFulfilled {
        order_id,
        items: plan.resulting_items().to_vec(),
    })
}
