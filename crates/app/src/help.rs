//! Help text for the operator commands.
//!
//! Only the text lives here; printing it is the caller's job.

const GENERAL: &str = "\
Available commands:
  help     - Show this help message
  add      - Add stock for an item
  delete   - Remove stock for an item, or the whole item
  list     - List all items in stock
  orders   - List recorded orders
  order    - Create a purchase or dispense order
  fulfill  - Apply a pending order to stock
  cancel   - Cancel a pending order
  exit     - Leave the program
Type 'help <command>' for details on one command.";

/// Help text for `topic`, or the general overview when absent.
pub fn help_text(topic: Option<&str>) -> String {
    let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) else {
        return GENERAL.to_string();
    };

    let body = match topic.to_ascii_lowercase().as_str() {
        "help" => "help: Show help for all commands or for one command.\n\
                   Usage: help [command]",
        "add" => "add: Add stock for an item, creating it if needed.\n\
                  Usage: add <name> <quantity>\n  \
                  <quantity> - a positive whole number",
        "delete" => "delete: Remove stock for an item.\n\
                     Usage: delete <name> [quantity]\n  \
                     Without a quantity the whole item is removed.\n  \
                     Removing more than is on hand is refused.",
        "list" => "list: Show every item with its on-hand quantity.\n\
                   Usage: list",
        "orders" => "orders: Show recorded orders, oldest first.\n\
                     Usage: orders [pending|fulfilled|cancelled]",
        "order" => "order: Record a purchase (incoming) or dispense (outgoing) order.\n\
                    Usage: order <purchase|dispense> <name> <quantity> [<name> <quantity> ...] [notes]\n  \
                    The order starts pending; stock changes only when it is fulfilled.",
        "fulfill" => "fulfill: Apply a pending order to stock.\n\
                      Usage: fulfill <order id>\n  \
                      A dispense order is applied completely or not at all.",
        "cancel" => "cancel: Cancel a pending order. Stock is not touched.\n\
                     Usage: cancel <order id>",
        "exit" => "exit: Leave the program.\n\
                   Usage: exit",
        _ => {
            return format!("Unknown command: {topic}\nType 'help' for a list of available commands.");
        }
    };
    body.to_string()
}
