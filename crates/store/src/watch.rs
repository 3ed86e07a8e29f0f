//! Live order-change subscription channel.
//!
//! Callback registration with an explicit cancellation token: dropping (or
//! cancelling) the returned [`OrderSubscription`] removes the subscriber, and
//! no further notifications are delivered through it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::records::OrderRecord;

/// Callback invoked with the full current order record set.
pub type OrderCallback = Box<dyn Fn(Vec<OrderRecord>) + Send + Sync>;

struct Subscriber {
    id: u64,
    notify: Arc<OrderCallback>,
}

/// Fan-out point for order-change notifications.
///
/// Best-effort broadcast: each registered subscriber gets a copy of the full
/// record set on every notification. Subscribers must be idempotent, since a
/// notification can repeat state they have already seen.
#[derive(Default)]
pub struct OrderWatch {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl OrderWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, notify: OrderCallback) -> OrderSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // If the lock is poisoned, we still return a token; it just never
        // receives notifications.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Subscriber {
                id,
                notify: Arc::new(notify),
            });
        }

        OrderSubscription {
            subscribers: Arc::downgrade(&self.subscribers),
            id,
        }
    }

    /// Deliver the current record set to every live subscriber.
    ///
    /// The subscriber list is snapshotted and the lock released before any
    /// callback runs, so a callback may mutate storage (re-entering this
    /// method) or drop a subscription without deadlocking.
    pub fn notify(&self, records: &[OrderRecord]) {
        let callbacks: Vec<Arc<OrderCallback>> = match self.subscribers.lock() {
            Ok(subs) => subs.iter().map(|s| Arc::clone(&s.notify)).collect(),
            Err(_) => return,
        };
        for notify in callbacks {
            notify(records.to_vec());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl core::fmt::Debug for OrderWatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderWatch")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Cancellation token for one order subscription.
///
/// Cancelling (or just dropping) the token unregisters the callback; no
/// notification is applied after that point.
#[derive(Debug)]
pub struct OrderSubscription {
    subscribers: Weak<Mutex<Vec<Subscriber>>>,
    id: u64,
}

impl OrderSubscription {
    /// Explicit unsubscribe. Equivalent to dropping the token.
    pub fn cancel(self) {}

    fn unregister(&self) {
        if let Some(subs) = self.subscribers.upgrade() {
            if let Ok(mut subs) = subs.lock() {
                subs.retain(|s| s.id != self.id);
            }
        }
    }
}

impl Drop for OrderSubscription {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl core::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use chrono::NaiveDate;
    use medledger_core::OrderId;
    use medledger_orders::OrderStatus;

    fn record() -> OrderRecord {
        OrderRecord {
            id: OrderId::new(),
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            status: OrderStatus::Ordered,
            entries: vec![],
        }
    }

    /// Callback that forwards every delivery into a channel.
    fn recorder() -> (OrderCallback, mpsc::Receiver<Vec<OrderRecord>>) {
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let callback = Box::new(move |records| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(records);
            }
        });
        (callback, rx)
    }

    #[test]
    fn subscribers_receive_the_full_record_set() {
        let watch = OrderWatch::new();
        let (callback, rx) = recorder();
        let _sub = watch.subscribe(callback);

        watch.notify(&[record(), record()]);
        assert_eq!(rx.recv().unwrap().len(), 2);
    }

    #[test]
    fn cancelled_subscription_receives_nothing_further() {
        let watch = OrderWatch::new();
        let (callback, rx) = recorder();
        let sub = watch.subscribe(callback);

        watch.notify(&[record()]);
        assert!(rx.recv().is_ok());

        sub.cancel();
        assert_eq!(watch.subscriber_count(), 0);
        watch.notify(&[record()]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn callback_may_notify_reentrantly() {
        let watch = Arc::new(OrderWatch::new());
        let inner = Arc::clone(&watch);
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let _sub = watch.subscribe(Box::new(move |records| {
            if !records.is_empty() {
                inner.notify(&[]);
            }
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(records.len());
            }
        }));

        watch.notify(&[record()]);
        // Outer delivery first, then the nested empty one.
        assert_eq!(rx.recv().unwrap(), 1);
        assert_eq!(rx.recv().unwrap(), 0);
    }

    #[test]
    fn dropping_the_token_unsubscribes() {
        let watch = OrderWatch::new();
        {
            let _sub = watch.subscribe(Box::new(|_| {}));
            assert_eq!(watch.subscriber_count(), 1);
        }
        assert_eq!(watch.subscriber_count(), 0);
    }

    #[test]
    fn multiple_subscribers_each_get_a_copy() {
        let watch = OrderWatch::new();
        let (callback_a, rx_a) = recorder();
        let (callback_b, rx_b) = recorder();
        let _a = watch.subscribe(callback_a);
        let _b = watch.subscribe(callback_b);

        watch.notify(&[record()]);
        assert_eq!(rx_a.recv().unwrap().len(), 1);
        assert_eq!(rx_b.recv().unwrap().len(), 1);
    }
}
