use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// A calendar month. Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month, rejecting `month` outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    /// The month containing `ts`, in `ts`'s own time zone
    pub fn of<Tz: TimeZone>(ts: &DateTime<Tz>) -> Self {
        YearMonth {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// The month containing the UTC instant `ts` as seen from `tz`
    pub fn in_zone<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> Self {
        Self::of(&ts.with_timezone(tz))
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-based
    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        // year/month are validated on construction, so this only falls back
        // for years outside chrono's supported range
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Midnight on the first day of the month, as a wall-clock time
    pub fn first_instant(self) -> NaiveDateTime {
        self.first_day().and_time(NaiveTime::MIN)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    /// Short header form, e.g. `Mar, 2024`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day().format("%b, %Y"))
    }
}

/// Wall-clock reading of a UTC instant in `tz`
pub fn local_time<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    ts.with_timezone(tz).naive_local()
}
