use crate::models::{Event, EventKind};
use crate::month::YearMonth;
use std::collections::BTreeMap;
use tracing::debug;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket {
    pub donated: u64,
    pub requested: u64,
}

impl Bucket {
    pub fn get(&self, measure: Measure) -> u64 {
        match measure {
            Measure::Donated => self.donated,
            Measure::Requested => self.requested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Donated,
    Requested,
}

/// Monthly sums per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    cells: BTreeMap<String, BTreeMap<YearMonth, Bucket>>,
}

impl Buckets {
    pub fn get(&self, month: YearMonth, category: &str) -> Option<&Bucket> {
        self.cells.get(category)?.get(&month)
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, &str, &Bucket)> {
        self.cells.iter().flat_map(|(category, months)| {
            months
                .iter()
                .map(move |(month, bucket)| (*month, category.as_str(), bucket))
        })
    }

    /// Sorted category labels.
    pub fn categories(&self) -> Vec<String> {
        self.cells.keys().cloned().collect()
    }

    /// Earliest and latest month with any activity, across all categories.
    pub fn month_span(&self) -> Option<(YearMonth, YearMonth)> {
        let first = self.cells.values().filter_map(|m| m.keys().next()).min()?;
        let last = self.cells.values().filter_map(|m| m.keys().next_back()).max()?;
        Some((*first, *last))
    }

    /// Whole-history totals per category, in category order.
    pub fn totals(&self) -> BTreeMap<String, Bucket> {
        self.cells
            .iter()
            .map(|(category, months)| {
                let total = months.values().fold(Bucket::default(), |acc, bucket| Bucket {
                    donated: acc.donated.saturating_add(bucket.donated),
                    requested: acc.requested.saturating_add(bucket.requested),
                });
                (category.clone(), total)
            })
            .collect()
    }
}

/// Trims and upper-cases a category label; blank or missing labels become `Unknown`.
pub fn normalize_category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_uppercase(),
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

pub fn aggregate(events: &[Event]) -> Buckets {
    let mut buckets = Buckets::default();
    for event in events {
        let Some(date) = event.timestamp else {
            debug!(kind = ?event.kind, "skipping event without a usable timestamp");
            continue;
        };

        let bucket = buckets
            .cells
            .entry(normalize_category(event.category.as_deref()))
            .or_default()
            .entry(YearMonth::from_date(date))
            .or_default();
        match event.kind {
            EventKind::Donation => bucket.donated = bucket.donated.saturating_add(event.amount),
            EventKind::Request => {
                bucket.requested = bucket.requested.saturating_add(event.amount)
            }
        }
    }
    buckets
}
