//! `medledger-core` — domain foundation building blocks.
//!
//! Strongly-typed identifiers, the domain error model, and the shared
//! calendar policy (expiry horizon, zeroing window, order dating). No
//! infrastructure concerns live here.

pub mod calendar;
pub mod error;
pub mod id;

pub use calendar::{
    EXPIRY_HORIZON_DAYS, ZEROING_WINDOW_DAYS, expiry_horizon, upcoming_monday, zeroing_day,
};
pub use error::{DomainError, DomainResult};
pub use id::{EntryId, ItemId, OrderId};
