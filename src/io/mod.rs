pub mod activity_io;
pub mod config_io;
pub mod kv_store;
pub mod lock;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore, PersistenceError};
