//! Infrastructure layer: persistence adapters behind the `Storage` boundary.

pub mod storage;

pub use storage::{InMemoryStorage, JsonFileStorage, Snapshot, Storage, StorageError};
