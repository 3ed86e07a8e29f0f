//! Stock ledger domain module.
//!
//! This crate contains the expiry-aware availability and replenishment rules,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod entry;
pub mod item;

pub use catalog::Catalog;
pub use entry::StockEntry;
pub use item::{Item, ItemConfig};
