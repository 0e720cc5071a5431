use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whole months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(self, other: Self) -> i64 {
        let from = i64::from(self.year) * 12 + i64::from(self.month);
        let to = i64::from(other.year) * 12 + i64::from(other.month);
        to - from
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Every month in `[start, end]`, in order. Empty when `start > end`.
pub fn month_range(start: YearMonth, end: YearMonth) -> impl Iterator<Item = YearMonth> {
    let len = (start.months_until(end) + 1).max(0) as usize;
    std::iter::successors(Some(start), |month| Some(month.next())).take(len)
}

/// The `count` months following `last`.
pub fn months_after(last: YearMonth, count: usize) -> Vec<YearMonth> {
    std::iter::successors(Some(last.next()), |month| Some(month.next()))
        .take(count)
        .collect()
}
