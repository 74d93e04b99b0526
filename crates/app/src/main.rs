use anyhow::Context;

use stockroom_app::{Command, CommandOutput, Config, Inventory};
use stockroom_infra::JsonFileStorage;
use stockroom_orders::OrderStatus;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    stockroom_observability::init(config.log_format);

    let storage = JsonFileStorage::open(&config.data_file).with_context(|| {
        format!("failed to open storage at {}", config.data_file.display())
    })?;
    let mut inventory = Inventory::load(&storage).context("failed to rehydrate inventory")?;

    tracing::info!(data_file = %config.data_file.display(), "stockroom ready");

    if let CommandOutput::Items(items) = Command::List.execute(&mut inventory, &storage)? {
        if items.is_empty() {
            println!("No items in stock.");
        }
        for item in items {
            println!("{}: {}", item.name, item.quantity);
        }
    }

    let pending = Command::ListOrders {
        status: Some(OrderStatus::Pending),
    };
    if let CommandOutput::Orders(orders) = pending.execute(&mut inventory, &storage)? {
        for order in orders {
            println!(
                "pending {} order {} ({} lines) {}",
                order.order_type(),
                order.id_typed(),
                order.item_count(),
                order.notes()
            );
        }
    }

    Ok(())
}
