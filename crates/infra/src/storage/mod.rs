//! Persistence boundary for the ledger and order records.
//!
//! The core only relies on the `Storage` trait: one save call per successful
//! mutating command, and a load at startup. File format and location belong
//! to the adapters.

pub mod in_memory;
pub mod json_file;
pub mod snapshot;
pub mod r#trait;

pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;
pub use snapshot::Snapshot;
pub use r#trait::{Storage, StorageError};
