//! A single stock entry: one dated (or undated) quantity lot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medledger_core::{EntryId, calendar};

/// One lot of stock belonging to exactly one item.
///
/// An entry without an expiry date never expires. A dated entry stops
/// counting as available once its date falls on or before the expiry
/// horizon (today + 14 days), so stock is written off two weeks before it
/// nominally goes bad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    id: EntryId,
    expiry: Option<NaiveDate>,
    amount: i64,
}

impl StockEntry {
    pub fn new(expiry: Option<NaiveDate>, amount: i64) -> Self {
        Self {
            id: EntryId::new(),
            expiry,
            amount,
        }
    }

    /// Rebuild an entry from persisted values, keeping its identity.
    pub fn with_id(id: EntryId, expiry: Option<NaiveDate>, amount: i64) -> Self {
        Self { id, expiry, amount }
    }

    /// Blank entry, used when an item is created with no stock recorded yet.
    pub fn blank() -> Self {
        Self::new(None, 0)
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn set_expiry(&mut self, expiry: Option<NaiveDate>) {
        self.expiry = expiry;
    }

    pub fn set_amount(&mut self, amount: i64) {
        self.amount = amount;
    }

    /// Whether this entry is past the ordering expiry horizon.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= calendar::expiry_horizon(today),
            None => false,
        }
    }

    /// Amount this entry contributes to available stock: its full amount, or
    /// zero once expired.
    pub fn available(&self, today: NaiveDate) -> i64 {
        if self.is_expired(today) { 0 } else { self.amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn undated_entry_never_expires() {
        let entry = StockEntry::new(None, 12);
        assert!(!entry.is_expired(date(2024, 3, 1)));
        assert_eq!(entry.available(date(2024, 3, 1)), 12);
    }

    #[test]
    fn entry_expires_fourteen_days_early() {
        let today = date(2024, 3, 1);
        // Nominal expiry exactly on the horizon: already written off.
        let on_horizon = StockEntry::new(Some(date(2024, 3, 15)), 10);
        assert!(on_horizon.is_expired(today));
        assert_eq!(on_horizon.available(today), 0);

        // One day past the horizon: still counts.
        let past_horizon = StockEntry::new(Some(date(2024, 3, 16)), 10);
        assert!(!past_horizon.is_expired(today));
        assert_eq!(past_horizon.available(today), 10);
    }

    #[test]
    fn blank_entry_is_undated_and_empty() {
        let entry = StockEntry::blank();
        assert_eq!(entry.expiry(), None);
        assert_eq!(entry.amount(), 0);
    }
}
