//! Stock item: a trackable consumable with configured stock thresholds.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medledger_core::{EntryId, ItemId};

use crate::entry::StockEntry;

/// Replenishment configuration for an item.
///
/// Any threshold may be unconfigured. Input forms represent "unset" as a
/// negative sentinel; [`ItemConfig::from_sentinels`] normalizes that here so
/// the rest of the domain only ever sees `Option`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Reorder threshold: stock at or below this level triggers ordering.
    pub min: Option<i64>,
    /// Target stock level ordering aims to reach.
    pub max: Option<i64>,
    /// Package size: purchase quantities are multiples of this.
    pub pkg: Option<i64>,
}

impl ItemConfig {
    pub fn new(min: Option<i64>, max: Option<i64>, pkg: Option<i64>) -> Self {
        Self { min, max, pkg }
    }

    /// Normalize persisted sentinel values (negative = unset; a package size
    /// of zero is equally unusable and treated as unset).
    pub fn from_sentinels(min: i64, max: i64, pkg: i64) -> Self {
        Self {
            min: (min >= 0).then_some(min),
            max: (max >= 0).then_some(max),
            pkg: (pkg > 0).then_some(pkg),
        }
    }

    /// Whether a reorder computation can be attempted at all.
    pub fn is_configured(&self) -> bool {
        self.min.is_some() && self.max.is_some() && self.pkg.is_some()
    }
}

/// A trackable consumable holding its stock entries and reorder state.
///
/// A single type covers both canonical items and alias items: an alias
/// carries `parent: Some(..)` and snapshots its group, visibility, and
/// thresholds from the parent at construction time. The snapshot is
/// deliberate — reconfiguring the parent later does not propagate. Only
/// canonical items ever produce a reorder recommendation; an alias folds its
/// available stock into the parent's computation instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    form_name: Option<String>,
    group: String,
    display: bool,
    config: ItemConfig,
    parent: Option<ItemId>,
    aliases: Vec<ItemId>,
    on_order: i64,
    to_order: i64,
    entries: Vec<StockEntry>,
}

impl Item {
    pub fn canonical(
        id: ItemId,
        name: impl Into<String>,
        form_name: Option<String>,
        group: impl Into<String>,
        display: bool,
        config: ItemConfig,
        entries: Vec<StockEntry>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            form_name,
            group: group.into(),
            display,
            config,
            parent: None,
            aliases: Vec::new(),
            on_order: 0,
            to_order: 0,
            entries,
        }
    }

    /// Build an alias of `parent`, snapshotting its group, visibility, and
    /// thresholds. Registration on the parent side is the catalog's job.
    pub fn alias(
        id: ItemId,
        name: impl Into<String>,
        entries: Vec<StockEntry>,
        parent: &Item,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            form_name: None,
            group: parent.group.clone(),
            display: parent.display,
            config: parent.config,
            parent: Some(parent.id),
            aliases: Vec::new(),
            on_order: 0,
            to_order: 0,
            entries,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Presentation name used only on the order-intake form. Items without
    /// one do not participate in that form.
    pub fn form_name(&self) -> Option<&str> {
        self.form_name.as_deref()
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn is_visible(&self) -> bool {
        self.display
    }

    pub fn config(&self) -> ItemConfig {
        self.config
    }

    pub fn set_config(&mut self, config: ItemConfig) {
        self.config = config;
    }

    pub fn is_alias(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn aliases(&self) -> &[ItemId] {
        &self.aliases
    }

    pub(crate) fn register_alias(&mut self, alias: ItemId) {
        self.aliases.push(alias);
    }

    /// Quantity currently sitting in effectively-`Ordered` purchase orders.
    pub fn on_order(&self) -> i64 {
        self.on_order
    }

    /// Last computed reorder recommendation. Aliases never recommend
    /// anything themselves; only the canonical item is purchased.
    pub fn to_order(&self) -> i64 {
        if self.is_alias() { 0 } else { self.to_order }
    }

    pub(crate) fn set_to_order(&mut self, to_order: i64) {
        self.to_order = to_order;
    }

    pub fn add_on_order(&mut self, amount: i64) {
        self.on_order += amount;
    }

    /// Subtract from the on-order counter, floored at zero.
    pub fn remove_on_order(&mut self, amount: i64) {
        self.on_order = (self.on_order - amount).max(0);
    }

    pub fn reset_on_order(&mut self) {
        self.on_order = 0;
    }

    /// Snapshot of the entry list (callers never see the live vec).
    pub fn entries(&self) -> Vec<StockEntry> {
        self.entries.clone()
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut StockEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    pub fn new_entry(&mut self, entry: StockEntry) {
        self.entries.push(entry);
    }

    /// Remove an entry by id; returns whether anything was removed.
    pub fn remove_entry(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        self.entries.len() != before
    }

    pub fn replace_entries(&mut self, entries: Vec<StockEntry>) {
        self.entries = entries;
    }

    /// Sum of unexpired entry amounts. Pure; entry order does not matter.
    pub fn available_quantity(&self, today: NaiveDate) -> i64 {
        self.entries.iter().map(|e| e.available(today)).sum()
    }

    /// Display ordering: grouping key first, then case-folded name, with the
    /// exact name as a final tiebreak to keep the ordering total.
    pub fn display_cmp(&self, other: &Item) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
            .then_with(|| self.name.cmp(&other.name))
    }
}
