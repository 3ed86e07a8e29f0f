//! The loaded order set: pending lookup, the on-order reduction pass, and
//! the receive transition.

use chrono::NaiveDate;
use tracing::{debug, warn};

use medledger_core::{DomainError, DomainResult, OrderId};
use medledger_ledger::Catalog;

use crate::order::{Order, OrderStatus};

/// All orders loaded into memory, most recent first.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole order set (full snapshots arrive from storage and
    /// from live updates alike) and re-sort by date descending.
    pub fn replace_all(&mut self, mut orders: Vec<Order>) {
        orders.sort_by(|a, b| b.date().cmp(&a.date()));
        self.orders = orders;
    }

    /// Orders in date-descending display order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// *The* pending order: the first order with persisted status `Pending`
    /// in scan order. Uniqueness is a data convention, not enforced here.
    pub fn pending(&self) -> Option<&Order> {
        self.orders
            .iter()
            .find(|o| o.status() == OrderStatus::Pending)
    }

    /// Recompute every item's on-order counter from scratch.
    ///
    /// Resets all counters, then adds each entry of every effectively
    /// `Ordered` order. Run as one deliberate pass before any reorder
    /// computation, so readers never observe a half-applied state.
    pub fn recompute_on_order(&self, catalog: &mut Catalog, today: NaiveDate) {
        catalog.reset_on_order();
        for order in &self.orders {
            if order.effective_status(today) != OrderStatus::Ordered {
                continue;
            }
            for entry in order.entries() {
                match catalog.get_mut(entry.item()) {
                    Some(item) => item.add_on_order(entry.amount()),
                    None => warn!(
                        order = %order.id(),
                        item = %entry.item(),
                        "order entry references an unloaded item; skipped"
                    ),
                }
            }
        }
        debug!(orders = self.orders.len(), "on-order pass complete");
    }

    /// Receive an order: subtract its entries from the items' on-order
    /// counters and mark it `Received`.
    ///
    /// Rejected for pending and already-received orders. An order that
    /// auto-demoted to `Zeroed` can still be received, but the subtraction
    /// is gated on the effective status being exactly `Ordered`, so a
    /// zeroed receive leaves any on-order residue in place.
    ///
    /// Returns the new status; persisting it is the caller's job.
    pub fn receive(
        &mut self,
        id: OrderId,
        catalog: &mut Catalog,
        today: NaiveDate,
    ) -> DomainResult<OrderStatus> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(DomainError::NotFound)?;

        match order.effective_status(today) {
            OrderStatus::Pending => {
                return Err(DomainError::invariant("a pending order cannot be received"));
            }
            OrderStatus::Received => {
                return Err(DomainError::invariant("order was already received"));
            }
            OrderStatus::Ordered => {
                for entry in order.entries() {
                    if let Some(item) = catalog.get_mut(entry.item()) {
                        item.remove_on_order(entry.amount());
                    }
                }
            }
            OrderStatus::Zeroed => {}
        }

        order.set_status(OrderStatus::Received);
        Ok(OrderStatus::Received)
    }
}
