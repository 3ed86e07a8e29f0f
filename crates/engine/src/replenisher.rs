//! The replenishment engine over loaded state.

use chrono::NaiveDate;
use tracing::{info, warn};

use medledger_core::{DomainError, EntryId, ItemId, OrderId};
use medledger_ledger::{Catalog, Item, ItemConfig, StockEntry};
use medledger_orders::{Order, OrderBook, OrderEntry, OrderStatus};
use medledger_reconcile::{SubmissionTarget, preview, submission_merge};
use medledger_store::{
    EntryRecord, ItemRecord, NewItemRecord, NewOrderRecord, OrderEntryRecord, OrderRecord,
    Storage, StorageError, with_retry,
};

use crate::error::EngineError;

/// Loaded catalog + order book, plus the operations over them.
///
/// Items must be fully loaded before any order is constructed — order
/// entries dereference items by id — so [`Replenisher::load`] is the only
/// way in, and live updates go through [`Replenisher::apply_order_records`]
/// which the subscription consumer calls after load completes. Every pass is
/// idempotent; re-applying the same records leaves the same state.
#[derive(Debug)]
pub struct Replenisher {
    catalog: Catalog,
    book: OrderBook,
}

fn item_from_record(record: ItemRecord) -> Item {
    let entries = entries_from_records(&record.entries);
    Item::canonical(
        record.id,
        record.name,
        record.form_name,
        record.group.unwrap_or_default(),
        record.display,
        ItemConfig::from_sentinels(record.min, record.max, record.pkg),
        entries,
    )
}

fn entries_from_records(records: &[EntryRecord]) -> Vec<StockEntry> {
    records
        .iter()
        .map(|r| StockEntry::new(r.expiry(), r.amount))
        .collect()
}

fn entry_records(item: &Item) -> Vec<EntryRecord> {
    item.entries()
        .iter()
        .map(|e| EntryRecord::new(e.expiry(), e.amount()))
        .collect()
}

impl Replenisher {
    /// Load everything from storage: items, then aliases, then orders.
    pub fn load(storage: &impl Storage, today: NaiveDate) -> Result<Self, StorageError> {
        let mut catalog = Catalog::new();
        for record in storage.load_items()? {
            catalog.insert(item_from_record(record));
        }
        for record in storage.load_alias_items()? {
            let entries = entries_from_records(&record.entries);
            if let Err(err) = catalog.insert_alias(record.id, record.name, entries, record.parent)
            {
                warn!(alias = %record.id, error = %err, "alias record skipped");
            }
        }

        let mut engine = Self {
            catalog,
            book: OrderBook::new(),
        };
        let order_records = storage.load_orders()?;
        engine.apply_order_records(&order_records, today);
        info!(
            items = engine.catalog.len(),
            orders = engine.book.len(),
            "replenisher loaded"
        );
        Ok(engine)
    }

    /// Rebuild the order book from a full record snapshot and re-run the
    /// on-order reduction pass.
    ///
    /// This is the entry point for live updates: the subscription consumer
    /// forwards each notified record set here. Entries naming an unknown
    /// item id are skipped with a warning rather than inventing items.
    pub fn apply_order_records(&mut self, records: &[OrderRecord], today: NaiveDate) {
        let mut orders = Vec::with_capacity(records.len());
        for record in records {
            let mut entries = Vec::with_capacity(record.entries.len());
            for line in &record.entries {
                if !self.catalog.contains(line.id) {
                    warn!(order = %record.id, item = %line.id, "order entry references unknown item; skipped");
                    continue;
                }
                match OrderEntry::new(line.id, line.amount) {
                    Ok(entry) => entries.push(entry),
                    Err(err) => {
                        warn!(order = %record.id, item = %line.id, error = %err, "invalid order entry skipped");
                    }
                }
            }
            orders.push(Order::new(record.id, record.date, entries, record.status));
        }
        self.book.replace_all(orders);
        self.book.recompute_on_order(&mut self.catalog, today);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Items in display order.
    pub fn items(&self) -> Vec<&Item> {
        self.catalog.items_sorted()
    }

    /// Orders, most recent first.
    pub fn orders(&self) -> &[Order] {
        self.book.orders()
    }

    pub fn pending_order(&self) -> Option<&Order> {
        self.book.pending()
    }

    /// The purchasing preview for the pending order (or an implicit empty
    /// one). Recomputes reorder state across the whole catalog.
    pub fn preview(&mut self, today: NaiveDate) -> Vec<String> {
        preview(&mut self.catalog, self.book.pending(), today)
    }

    /// Merge operator-entered quantities into the pending order and persist
    /// the result. Returns the affected order id, or `None` when there was
    /// nothing to submit. The in-memory book is refreshed by the storage
    /// notification that follows the write.
    pub fn submit(
        &self,
        storage: &impl Storage,
        form_input: &[(ItemId, i64)],
        today: NaiveDate,
    ) -> Result<Option<OrderId>, StorageError> {
        let Some(plan) = submission_merge(form_input, self.book.pending(), today) else {
            return Ok(None);
        };
        let entries: Vec<OrderEntryRecord> = plan
            .entries
            .iter()
            .map(|&(id, amount)| OrderEntryRecord { id, amount })
            .collect();

        match plan.target {
            SubmissionTarget::UpdatePending(order_id) => {
                with_retry(|| storage.persist_order_entries(order_id, entries.clone()))?;
                Ok(Some(order_id))
            }
            SubmissionTarget::CreatePending { date } => {
                let order_id = with_retry(|| {
                    storage.persist_new_order(NewOrderRecord {
                        date,
                        status: OrderStatus::Pending,
                        entries: entries.clone(),
                    })
                })?;
                Ok(Some(order_id))
            }
        }
    }

    /// Receive an order and persist the transition.
    pub fn receive(
        &mut self,
        storage: &impl Storage,
        order_id: OrderId,
        today: NaiveDate,
    ) -> Result<OrderStatus, EngineError> {
        let status = self.book.receive(order_id, &mut self.catalog, today)?;
        with_retry(|| storage.persist_status(order_id, status))?;
        Ok(status)
    }

    /// Add a stock entry to an item, persist, and recompute its reorder.
    pub fn add_item_entry(
        &mut self,
        storage: &impl Storage,
        item_id: ItemId,
        entry: StockEntry,
        today: NaiveDate,
    ) -> Result<(), EngineError> {
        let item = self
            .catalog
            .get_mut(item_id)
            .ok_or(DomainError::UnknownItem(item_id))?;
        item.new_entry(entry);
        self.persist_and_recompute(storage, item_id, today)
    }

    /// Remove a stock entry from an item, persist, and recompute.
    pub fn remove_item_entry(
        &mut self,
        storage: &impl Storage,
        item_id: ItemId,
        entry_id: EntryId,
        today: NaiveDate,
    ) -> Result<(), EngineError> {
        let item = self
            .catalog
            .get_mut(item_id)
            .ok_or(DomainError::UnknownItem(item_id))?;
        item.remove_entry(entry_id);
        self.persist_and_recompute(storage, item_id, today)
    }

    /// Replace an item's entry list wholesale, persist, and recompute.
    pub fn replace_item_entries(
        &mut self,
        storage: &impl Storage,
        item_id: ItemId,
        entries: Vec<StockEntry>,
        today: NaiveDate,
    ) -> Result<(), EngineError> {
        let item = self
            .catalog
            .get_mut(item_id)
            .ok_or(DomainError::UnknownItem(item_id))?;
        item.replace_entries(entries);
        self.persist_and_recompute(storage, item_id, today)
    }

    fn persist_and_recompute(
        &mut self,
        storage: &impl Storage,
        item_id: ItemId,
        today: NaiveDate,
    ) -> Result<(), EngineError> {
        let records = self
            .catalog
            .get(item_id)
            .map(entry_records)
            .ok_or(DomainError::UnknownItem(item_id))?;
        with_retry(|| storage.persist_entries(item_id, records.clone()))?;
        self.catalog.calculate_reorder(item_id, today)?;
        Ok(())
    }

    /// Persist a brand-new canonical item. The caller reloads (or waits for
    /// the next full refresh) to pick it up; threshold sentinels are
    /// normalized on that load.
    pub fn create_item(
        &self,
        storage: &impl Storage,
        record: NewItemRecord,
    ) -> Result<ItemId, StorageError> {
        with_retry(|| storage.persist_new_item(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, mpsc};

    use medledger_store::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        // A Wednesday.
        date(2024, 3, 6)
    }

    fn seed_item(storage: &MemoryStorage, name: &str, min: i64, max: i64, pkg: i64, stock: i64) -> ItemId {
        let id = ItemId::new();
        storage.seed_item(ItemRecord {
            id,
            name: name.to_string(),
            form_name: Some(name.to_string()),
            group: None,
            display: true,
            min,
            max,
            pkg,
            entries: vec![EntryRecord::new(None, stock)],
        });
        id
    }

    #[test]
    fn load_builds_catalog_and_applies_orders() {
        medledger_observability::init();
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);
        storage.seed_order(OrderRecord {
            id: OrderId::new(),
            date: today() - chrono::Duration::days(1),
            status: OrderStatus::Ordered,
            entries: vec![OrderEntryRecord { id: item, amount: 20 }],
        });

        let engine = Replenisher::load(&storage, today()).unwrap();
        let loaded = engine.catalog().get(item).unwrap();
        assert_eq!(loaded.available_quantity(today()), 4);
        assert_eq!(loaded.on_order(), 20);
    }

    #[test]
    fn order_entries_for_unknown_items_are_skipped() {
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);
        storage.seed_order(OrderRecord {
            id: OrderId::new(),
            date: today(),
            status: OrderStatus::Ordered,
            entries: vec![
                OrderEntryRecord { id: item, amount: 5 },
                OrderEntryRecord { id: ItemId::new(), amount: 99 },
            ],
        });

        let engine = Replenisher::load(&storage, today()).unwrap();
        assert_eq!(engine.orders()[0].entries().len(), 1);
        assert_eq!(engine.catalog().get(item).unwrap().on_order(), 5);
    }

    #[test]
    fn aliases_load_after_items_and_fold_into_the_parent() {
        let storage = MemoryStorage::new();
        let parent = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);
        storage.seed_alias(medledger_store::AliasRecord {
            id: ItemId::new(),
            name: "Amoxi generic".to_string(),
            parent,
            entries: vec![EntryRecord::new(None, 20)],
        });

        let mut engine = Replenisher::load(&storage, today()).unwrap();
        // covered = 4 + 20 = 24 > min: nothing suggested.
        assert!(engine.preview(today()).is_empty());
    }

    #[test]
    fn preview_reflects_auto_candidates() {
        let storage = MemoryStorage::new();
        seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);

        let mut engine = Replenisher::load(&storage, today()).unwrap();
        assert_eq!(engine.preview(today()), vec!["Amoxicillin: x40"]);
    }

    #[test]
    fn submit_creates_a_pending_order_dated_monday_with_manual_amounts_only() {
        let storage = MemoryStorage::new();
        // An auto-candidate that must NOT end up persisted.
        seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);
        let manual = seed_item(&storage, "Vitamin C", 0, 0, 0, 100);

        let engine = Replenisher::load(&storage, today()).unwrap();
        let order_id = engine
            .submit(&storage, &[(manual, 3)], today())
            .unwrap()
            .unwrap();

        let orders = storage.load_orders().unwrap();
        assert_eq!(orders.len(), 1);
        let record = &orders[0];
        assert_eq!(record.id, order_id);
        assert_eq!(record.status, OrderStatus::Pending);
        // Upcoming Monday after Wednesday 2024-03-06.
        assert_eq!(record.date, date(2024, 3, 11));
        assert_eq!(record.entries, vec![OrderEntryRecord { id: manual, amount: 3 }]);
    }

    #[test]
    fn submit_merges_into_the_existing_pending_order() {
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Vitamin C", 0, 0, 0, 100);
        storage.seed_order(OrderRecord {
            id: OrderId::new(),
            date: date(2024, 3, 11),
            status: OrderStatus::Pending,
            entries: vec![OrderEntryRecord { id: item, amount: 5 }],
        });

        let engine = Replenisher::load(&storage, today()).unwrap();
        engine.submit(&storage, &[(item, 3)], today()).unwrap();

        let orders = storage.load_orders().unwrap();
        assert_eq!(orders[0].entries, vec![OrderEntryRecord { id: item, amount: 8 }]);
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        let storage = MemoryStorage::new();
        seed_item(&storage, "Vitamin C", 0, 0, 0, 100);

        let engine = Replenisher::load(&storage, today()).unwrap();
        assert_eq!(engine.submit(&storage, &[], today()).unwrap(), None);
        assert!(storage.load_orders().unwrap().is_empty());
    }

    #[test]
    fn receive_persists_the_transition_and_clears_on_order() {
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);
        let order_id = OrderId::new();
        storage.seed_order(OrderRecord {
            id: order_id,
            date: today() - chrono::Duration::days(1),
            status: OrderStatus::Ordered,
            entries: vec![OrderEntryRecord { id: item, amount: 20 }],
        });

        let mut engine = Replenisher::load(&storage, today()).unwrap();
        assert_eq!(engine.catalog().get(item).unwrap().on_order(), 20);

        let status = engine.receive(&storage, order_id, today()).unwrap();
        assert_eq!(status, OrderStatus::Received);
        assert_eq!(engine.catalog().get(item).unwrap().on_order(), 0);
        assert_eq!(
            storage.load_orders().unwrap()[0].status,
            OrderStatus::Received
        );
    }

    #[test]
    fn live_updates_flow_through_apply_order_records() {
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);

        let mut engine = Replenisher::load(&storage, today()).unwrap();

        // Subscribe only after the item set is loaded.
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let _sub = storage.subscribe_orders(Box::new(move |records| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(records);
            }
        }));

        storage
            .persist_new_order(NewOrderRecord {
                date: today(),
                status: OrderStatus::Ordered,
                entries: vec![OrderEntryRecord { id: item, amount: 10 }],
            })
            .unwrap();

        let records = rx.recv().unwrap();
        engine.apply_order_records(&records, today());
        assert_eq!(engine.catalog().get(item).unwrap().on_order(), 10);

        // Re-applying the same snapshot is idempotent.
        engine.apply_order_records(&records, today());
        assert_eq!(engine.catalog().get(item).unwrap().on_order(), 10);
    }

    #[test]
    fn entry_mutations_persist_and_recompute() {
        let storage = MemoryStorage::new();
        let item = seed_item(&storage, "Amoxicillin", 10, 50, 10, 4);

        let mut engine = Replenisher::load(&storage, today()).unwrap();
        engine
            .add_item_entry(&storage, item, StockEntry::new(None, 30), today())
            .unwrap();

        // Persisted: original 4 plus the new 30.
        let records = storage.load_items().unwrap();
        let total: i64 = records[0].entries.iter().map(|e| e.amount).sum();
        assert_eq!(total, 34);
        // Recomputed: covered 34 > min 10, nothing to order.
        assert_eq!(engine.catalog().get(item).unwrap().to_order(), 0);
    }
}
