//! In-memory storage for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use medledger_core::{ItemId, OrderId};
use medledger_orders::OrderStatus;

use crate::error::StorageError;
use crate::records::{
    AliasRecord, EntryRecord, ItemRecord, NewItemRecord, NewOrderRecord, OrderEntryRecord,
    OrderRecord,
};
use crate::storage::Storage;
use crate::watch::{OrderCallback, OrderSubscription, OrderWatch};

/// In-memory document store.
///
/// Intended for tests/dev. Order mutations notify subscribers with the full
/// current order set, mirroring how a live backend streams snapshots.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<ItemId, ItemRecord>>,
    aliases: RwLock<HashMap<ItemId, AliasRecord>>,
    orders: RwLock<HashMap<OrderId, OrderRecord>>,
    watch: OrderWatch,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item record (test/dev setup).
    pub fn seed_item(&self, record: ItemRecord) {
        if let Ok(mut items) = self.items.write() {
            items.insert(record.id, record);
        }
    }

    /// Seed an alias record (test/dev setup).
    pub fn seed_alias(&self, record: AliasRecord) {
        if let Ok(mut aliases) = self.aliases.write() {
            aliases.insert(record.id, record);
        }
    }

    /// Seed an order record (test/dev setup).
    pub fn seed_order(&self, record: OrderRecord) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(record.id, record);
        }
    }

    fn notify_orders(&self) -> Result<(), StorageError> {
        let records = self.load_orders()?;
        self.watch.notify(&records);
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load_items(&self) -> Result<Vec<ItemRecord>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.values().cloned().collect())
    }

    fn load_alias_items(&self) -> Result<Vec<AliasRecord>, StorageError> {
        let aliases = self.aliases.read().map_err(|_| StorageError::Poisoned)?;
        Ok(aliases.values().cloned().collect())
    }

    fn load_orders(&self) -> Result<Vec<OrderRecord>, StorageError> {
        let orders = self.orders.read().map_err(|_| StorageError::Poisoned)?;
        Ok(orders.values().cloned().collect())
    }

    fn persist_entries(
        &self,
        item: ItemId,
        entries: Vec<EntryRecord>,
    ) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        let record = items
            .get_mut(&item)
            .ok_or(StorageError::ItemNotFound(item))?;
        record.entries = entries;
        Ok(())
    }

    fn persist_status(&self, order: OrderId, status: OrderStatus) -> Result<(), StorageError> {
        {
            let mut orders = self.orders.write().map_err(|_| StorageError::Poisoned)?;
            let record = orders
                .get_mut(&order)
                .ok_or(StorageError::OrderNotFound(order))?;
            record.status = status;
        }
        self.notify_orders()
    }

    fn persist_new_order(&self, record: NewOrderRecord) -> Result<OrderId, StorageError> {
        let id = OrderId::new();
        {
            let mut orders = self.orders.write().map_err(|_| StorageError::Poisoned)?;
            orders.insert(
                id,
                OrderRecord {
                    id,
                    date: record.date,
                    status: record.status,
                    entries: record.entries,
                },
            );
        }
        self.notify_orders()?;
        Ok(id)
    }

    fn persist_order_entries(
        &self,
        order: OrderId,
        entries: Vec<OrderEntryRecord>,
    ) -> Result<(), StorageError> {
        {
            let mut orders = self.orders.write().map_err(|_| StorageError::Poisoned)?;
            let record = orders
                .get_mut(&order)
                .ok_or(StorageError::OrderNotFound(order))?;
            record.entries = entries;
        }
        self.notify_orders()
    }

    fn persist_new_item(&self, record: NewItemRecord) -> Result<ItemId, StorageError> {
        let id = ItemId::new();
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        items.insert(
            id,
            ItemRecord {
                id,
                name: record.name,
                form_name: record.form_name,
                group: record.group,
                display: record.display,
                min: record.min,
                max: record.max,
                pkg: record.pkg,
                entries: record.entries,
            },
        );
        Ok(id)
    }

    fn subscribe_orders(&self, notify: OrderCallback) -> OrderSubscription {
        self.watch.subscribe(notify)
    }
}
