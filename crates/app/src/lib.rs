//! Command layer: turns already-parsed requests into ledger and order changes
//! and drives persistence.

pub mod command;
pub mod config;
pub mod help;
pub mod inventory;

pub use command::{Command, CommandError, CommandOutput};
pub use config::{Config, ConfigError};
pub use inventory::Inventory;
