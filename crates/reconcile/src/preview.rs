//! Read-only purchasing preview.

use chrono::NaiveDate;

use medledger_core::ItemId;
use medledger_ledger::Catalog;
use medledger_orders::Order;

/// Build the preview of what the next submission would purchase.
///
/// Runs the reorder computation over the whole catalog, then merges the
/// auto-candidates (canonical items with a positive recommendation) with the
/// pending order's manual entries:
///
/// - a manual entry larger than the item's recommendation replaces the auto
///   line (manual overrides auto);
/// - a manual entry at or below the recommendation is absorbed into the auto
///   line (the larger quantity wins, never the sum);
/// - a manual entry for a non-candidate item shows unchanged.
///
/// Safe to re-run on every render; recomputes from current state each time.
pub fn preview(catalog: &mut Catalog, pending: Option<&Order>, today: NaiveDate) -> Vec<String> {
    catalog.calculate_all(today);

    let mut auto_candidates: Vec<ItemId> = catalog
        .items_sorted()
        .iter()
        .filter(|item| item.to_order() > 0)
        .map(|item| item.id())
        .collect();

    let mut lines: Vec<String> = Vec::new();

    if let Some(order) = pending {
        for entry in order.entries() {
            let Some(item) = catalog.get(entry.item()) else {
                continue;
            };
            if let Some(pos) = auto_candidates.iter().position(|id| *id == entry.item()) {
                if entry.amount() > item.to_order() {
                    lines.push(format!("{}: x{}", item.name(), entry.amount()));
                    auto_candidates.remove(pos);
                }
                // Otherwise the auto line below already covers this entry.
            } else {
                lines.push(format!("{}: x{}", item.name(), entry.amount()));
            }
        }
    }

    for id in auto_candidates {
        if let Some(item) = catalog.get(id) {
            lines.push(format!("{}: x{}", item.name(), item.to_order()));
        }
    }

    lines.sort();
    lines
}
