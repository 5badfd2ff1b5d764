#![forbid(unsafe_code)]

pub mod keys;
pub mod repository;
pub mod sheet;
pub mod sqlite;

pub use keys::{SheetField, StorageKeys};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use sheet::{ConfigRecord, SheetRepository};
