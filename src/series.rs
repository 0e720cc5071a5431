use crate::aggregate::{Buckets, Measure};
use crate::month::{month_range, YearMonth};

/// Dense monthly series for one category over `[start, end]`, zero-filled.
pub fn build_series(
    buckets: &Buckets,
    category: &str,
    start: YearMonth,
    end: YearMonth,
    measure: Measure,
) -> Vec<u64> {
    month_range(start, end)
        .map(|month| {
            buckets
                .get(month, category)
                .map(|bucket| bucket.get(measure))
                .unwrap_or(0)
        })
        .collect()
}
