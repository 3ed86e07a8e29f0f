//! The loaded item set and the replenishment computation over it.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use medledger_core::{DomainError, DomainResult, ItemId};

use crate::entry::StockEntry;
use crate::item::Item;

/// All items loaded into memory, canonical and alias alike, keyed by id.
///
/// The catalog is the shared state the order book and the reconciliation
/// engine both read; every computation over it is synchronous and safe to
/// re-run as live updates arrive.
#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<ItemId, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a canonical item. Replaces any previous item with the same id.
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id(), item);
    }

    /// Build and insert an alias of an existing canonical item.
    ///
    /// The alias snapshots the parent's group, visibility, and thresholds,
    /// and registers itself on the parent so the parent's reorder
    /// computation folds in the alias's stock. That registration is the only
    /// parent mutation alias construction causes.
    pub fn insert_alias(
        &mut self,
        id: ItemId,
        name: impl Into<String>,
        entries: Vec<StockEntry>,
        parent_id: ItemId,
    ) -> DomainResult<()> {
        let parent = self
            .items
            .get(&parent_id)
            .ok_or(DomainError::UnknownItem(parent_id))?;
        if parent.is_alias() {
            return Err(DomainError::invariant(
                "alias parent must be a canonical item",
            ));
        }
        let alias = Item::alias(id, name, entries, parent);
        if let Some(parent) = self.items.get_mut(&parent_id) {
            parent.register_alias(id);
        }
        self.items.insert(id, alias);
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items in display order: grouping key first, then name.
    pub fn items_sorted(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.display_cmp(b));
        items
    }

    /// Zero every item's on-order counter. The order book's reduction pass
    /// runs this before re-adding amounts from effectively-ordered orders.
    pub fn reset_on_order(&mut self) {
        for item in self.items.values_mut() {
            item.reset_on_order();
        }
    }

    /// Compute the reorder recommendation for one canonical item.
    ///
    /// `covered` is the item's own unexpired stock, plus what is already on
    /// order, plus the unexpired stock of every registered alias. At or
    /// below `min`, the recommendation tops up toward `max` in whole
    /// packages, clamped non-negative. Aliases and items with unconfigured
    /// thresholds short-circuit to zero rather than erroring.
    ///
    /// Idempotent: unchanged inputs always yield the same `to_order`.
    pub fn calculate_reorder(&mut self, id: ItemId, today: NaiveDate) -> DomainResult<i64> {
        let item = self.items.get(&id).ok_or(DomainError::UnknownItem(id))?;

        if item.is_alias() {
            return Ok(0);
        }

        let config = item.config();
        let (Some(min), Some(max), Some(pkg)) = (config.min, config.max, config.pkg) else {
            if let Some(item) = self.items.get_mut(&id) {
                item.set_to_order(0);
            }
            return Ok(0);
        };
        if pkg <= 0 {
            // Unusable package size suppresses the computation; never divide.
            if let Some(item) = self.items.get_mut(&id) {
                item.set_to_order(0);
            }
            return Ok(0);
        }

        let mut covered = item.available_quantity(today) + item.on_order();
        for alias_id in item.aliases().to_vec() {
            if let Some(alias) = self.items.get(&alias_id) {
                covered += alias.available_quantity(today);
            }
        }

        let to_order = if covered <= min {
            // div_euclid floors toward negative infinity for a positive
            // divisor, so a covered amount above max clamps to zero.
            ((max - covered).div_euclid(pkg) * pkg).max(0)
        } else {
            0
        };

        if let Some(item) = self.items.get_mut(&id) {
            item.set_to_order(to_order);
        }
        Ok(to_order)
    }

    /// Run the reorder computation for every item in the catalog.
    pub fn calculate_all(&mut self, today: NaiveDate) {
        let ids = self.ids();
        for id in ids {
            // Ids came from the map; the lookup cannot fail mid-pass.
            let _ = self.calculate_reorder(id, today);
        }
        debug!(items = self.items.len(), "reorder pass complete");
    }
}
