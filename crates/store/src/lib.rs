//! Storage collaborator boundary.
//!
//! Plain persisted records, the [`Storage`] trait the core consumes, an
//! in-memory implementation for tests/dev, the transient-failure retry
//! wrapper, and the live order-change subscription channel.

pub mod error;
pub mod memory;
pub mod records;
pub mod retry;
pub mod storage;
pub mod watch;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use records::{
    AliasRecord, EntryRecord, ItemRecord, NewItemRecord, NewOrderRecord, OrderEntryRecord,
    OrderRecord,
};
pub use retry::{with_retry, with_retry_config};
pub use storage::Storage;
pub use watch::{OrderCallback, OrderSubscription, OrderWatch};
