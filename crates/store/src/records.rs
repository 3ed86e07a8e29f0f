//! Plain persisted record shapes exchanged with the storage collaborator.
//!
//! Sentinel conventions mirror the stored documents: thresholds use a
//! negative value for "unset", entry dates use the empty string for
//! "does not expire".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medledger_core::{ItemId, OrderId};
use medledger_orders::OrderStatus;

/// One persisted stock entry: ISO date string (empty = undated) + amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(default)]
    pub date: String,
    pub amount: i64,
}

impl EntryRecord {
    pub fn new(expiry: Option<NaiveDate>, amount: i64) -> Self {
        Self {
            date: expiry.map(|d| d.to_string()).unwrap_or_default(),
            amount,
        }
    }

    /// Parsed expiry date. Empty and unparseable dates both read as
    /// undated, so a corrupt date field can only ever overcount stock.
    pub fn expiry(&self) -> Option<NaiveDate> {
        if self.date.is_empty() {
            None
        } else {
            self.date.parse().ok()
        }
    }
}

/// Persisted canonical item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub form_name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub display: bool,
    pub min: i64,
    pub max: i64,
    pub pkg: i64,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

/// A canonical item about to be persisted for the first time (no id yet;
/// storage assigns one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemRecord {
    pub name: String,
    #[serde(default)]
    pub form_name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub display: bool,
    pub min: i64,
    pub max: i64,
    pub pkg: i64,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

/// Persisted alias item. Thresholds are not stored; they are snapshotted
/// from the parent when the catalog loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub id: ItemId,
    pub name: String,
    pub parent: ItemId,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

/// One persisted order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntryRecord {
    pub id: ItemId,
    pub amount: i64,
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub date: NaiveDate,
    pub status: OrderStatus,
    #[serde(default)]
    pub entries: Vec<OrderEntryRecord>,
}

/// An order about to be persisted for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRecord {
    pub date: NaiveDate,
    pub status: OrderStatus,
    pub entries: Vec<OrderEntryRecord>,
}
