//! Shared calendar policy.
//!
//! All date math is a pure function of an explicit `today`; domain code never
//! reads the wall clock itself. The composition root samples the clock once
//! per pass so every computation in that pass sees the same day.

use chrono::{Datelike, Duration, NaiveDate};

/// A dated stock entry stops counting as available this many days before its
/// nominal expiry date.
pub const EXPIRY_HORIZON_DAYS: i64 = 14;

/// An order still marked `Ordered` after this many days is treated as zeroed.
pub const ZEROING_WINDOW_DAYS: i64 = 5;

/// Latest expiry date that is already considered expired for ordering
/// purposes: entries dated on or before this day are excluded from available
/// stock.
pub fn expiry_horizon(today: NaiveDate) -> NaiveDate {
    today + Duration::days(EXPIRY_HORIZON_DAYS)
}

/// Oldest order date that still counts as on order. Orders dated strictly
/// before this day demote from `Ordered` to `Zeroed`.
pub fn zeroing_day(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ZEROING_WINDOW_DAYS)
}

/// Date a newly created pending order is placed on: the next Monday strictly
/// after `today`. Amounts entered on a Monday go out the following week.
pub fn upcoming_monday(today: NaiveDate) -> NaiveDate {
    let offset = 7 - i64::from(today.weekday().num_days_from_monday());
    today + Duration::days(offset)
}
