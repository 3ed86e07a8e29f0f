//! Purchase-order lifecycle domain module.
//!
//! Status transitions, the date-driven demotion rule, and the explicit
//! on-order reduction pass over the loaded order set.

pub mod book;
pub mod order;

pub use book::OrderBook;
pub use order::{Order, OrderEntry, OrderStatus};
