//! The storage collaborator contract.

use medledger_core::{ItemId, OrderId};
use medledger_orders::OrderStatus;

use crate::error::StorageError;
use crate::records::{
    AliasRecord, EntryRecord, ItemRecord, NewItemRecord, NewOrderRecord, OrderEntryRecord,
    OrderRecord,
};
use crate::watch::{OrderCallback, OrderSubscription};

/// Persistent document storage as the core consumes it.
///
/// All persist operations are fire-and-forget from the core's perspective:
/// implementations own their transport concerns and surface a hard
/// [`StorageError`] only once internal handling is exhausted (callers wrap
/// mutations in [`crate::with_retry`] for the transient cases).
pub trait Storage {
    fn load_items(&self) -> Result<Vec<ItemRecord>, StorageError>;

    fn load_alias_items(&self) -> Result<Vec<AliasRecord>, StorageError>;

    fn load_orders(&self) -> Result<Vec<OrderRecord>, StorageError>;

    /// Overwrite one item's stock entry list.
    fn persist_entries(&self, item: ItemId, entries: Vec<EntryRecord>)
    -> Result<(), StorageError>;

    /// Persist an explicit status transition.
    fn persist_status(&self, order: OrderId, status: OrderStatus) -> Result<(), StorageError>;

    /// Persist a brand-new order; storage assigns and returns the id.
    fn persist_new_order(&self, record: NewOrderRecord) -> Result<OrderId, StorageError>;

    /// Overwrite one order's entry list.
    fn persist_order_entries(
        &self,
        order: OrderId,
        entries: Vec<OrderEntryRecord>,
    ) -> Result<(), StorageError>;

    /// Persist a brand-new canonical item; storage assigns and returns the id.
    fn persist_new_item(&self, record: NewItemRecord) -> Result<ItemId, StorageError>;

    /// Live notification of the full current order record set.
    ///
    /// The returned subscription stops delivery when cancelled or dropped.
    /// Consumers must not subscribe before their item set is loaded: order
    /// records dereference items by id.
    fn subscribe_orders(&self, notify: OrderCallback) -> OrderSubscription;
}
