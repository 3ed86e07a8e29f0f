//! A purchase order and its lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medledger_core::{DomainError, DomainResult, ItemId, OrderId, calendar};
use medledger_ledger::Catalog;

/// Purchase order status lifecycle.
///
/// `Pending → Ordered → Received`; a stale `Ordered` order reads as `Zeroed`
/// through [`Order::effective_status`] without the persisted status changing.
/// Serialized as the capitalized variant name, matching stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Ordered,
    Received,
    Zeroed,
}

impl OrderStatus {
    /// Badge colour the UI collaborator shows for this status.
    pub fn badge_colour(self) -> &'static str {
        match self {
            OrderStatus::Ordered => "secondary",
            OrderStatus::Received => "success",
            OrderStatus::Zeroed => "warning",
            OrderStatus::Pending => "info",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Received => "Received",
            OrderStatus::Zeroed => "Zeroed",
        };
        f.write_str(s)
    }
}

/// One (item, quantity) line inside an order. The item is referenced by id
/// into the shared catalog, never owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    item: ItemId,
    amount: i64,
}

impl OrderEntry {
    pub fn new(item: ItemId, amount: i64) -> DomainResult<Self> {
        if amount < 1 {
            return Err(DomainError::validation(
                "order entry amount must be at least 1",
            ));
        }
        Ok(Self { item, amount })
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// A purchase order: a dated list of entries plus a persisted status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    date: NaiveDate,
    entries: Vec<OrderEntry>,
    status: OrderStatus,
}

impl Order {
    pub fn new(id: OrderId, date: NaiveDate, entries: Vec<OrderEntry>, status: OrderStatus) -> Self {
        Self {
            id,
            date,
            entries,
            status,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Status as persisted in storage.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Status used by all in-memory logic and display: a persisted `Ordered`
    /// older than the zeroing window reads as `Zeroed`. Recomputed on every
    /// call; the demotion itself never writes anything back.
    pub fn effective_status(&self, today: NaiveDate) -> OrderStatus {
        if self.status == OrderStatus::Ordered && self.date < calendar::zeroing_day(today) {
            OrderStatus::Zeroed
        } else {
            self.status
        }
    }

    pub fn is_received(&self) -> bool {
        self.status == OrderStatus::Received
    }

    /// Snapshot of the entry list.
    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn replace_entries(&mut self, entries: Vec<OrderEntry>) {
        self.entries = entries;
    }

    /// The entry referencing `item`, if any.
    pub fn entry_for(&self, item: ItemId) -> Option<&OrderEntry> {
        self.entries.iter().find(|e| e.item() == item)
    }

    /// Sorted human-readable `"name: xN"` lines, one per entry. Entries
    /// whose item is missing from the catalog are omitted.
    pub fn content(&self, catalog: &Catalog) -> Vec<String> {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| {
                catalog
                    .get(entry.item())
                    .map(|item| format!("{}: x{}", item.name(), entry.amount()))
            })
            .collect();
        lines.sort();
        lines
    }
}
