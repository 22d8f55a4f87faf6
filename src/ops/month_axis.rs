use chrono::{DateTime, Datelike, TimeZone};

use crate::model::month::YearMonth;

/// Whole years shown before the current year
pub const YEARS_BEFORE: i32 = 2;
/// Whole years shown after the current year
pub const YEARS_AFTER: i32 = 1;

/// Every month from January two years before `now`'s year through December
/// one year after it, in chronological order (48 entries).
pub fn build_months<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<YearMonth> {
    let year = now.year();
    ((year - YEARS_BEFORE)..=(year + YEARS_AFTER))
        .flat_map(|y| (1..=12).filter_map(move |m| YearMonth::new(y, m)))
        .collect()
}

/// Whether `month` is the month containing `now`
pub fn is_current_month<Tz: TimeZone>(month: YearMonth, now: &DateTime<Tz>) -> bool {
    month == YearMonth::of(now)
}

/// Index of the current month within `months`, if present
pub fn current_month_index<Tz: TimeZone>(months: &[YearMonth], now: &DateTime<Tz>) -> Option<usize> {
    months.iter().position(|m| is_current_month(*m, now))
}
