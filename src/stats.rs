use crate::aggregate::{aggregate, Buckets, Measure};
use crate::forecast::Forecaster;
use crate::models::{AggregateStats, CategorySeries, CategoryTotals, Event, PredictiveSeries};
use crate::month::{month_range, months_after};
use crate::series::build_series;

pub fn build_stats(events: &[Event]) -> AggregateStats {
    let totals = aggregate(events).totals();

    let per_category: Vec<CategoryTotals> = totals
        .into_iter()
        .map(|(category, bucket)| CategoryTotals {
            category,
            needed: bucket.requested,
            donated: bucket.donated,
        })
        .collect();

    AggregateStats {
        most_needed: leader(&per_category, |row| row.needed),
        most_donated: leader(&per_category, |row| row.donated),
        per_category,
    }
}

/// First category with the strictly largest non-zero value.
fn leader(rows: &[CategoryTotals], value: impl Fn(&CategoryTotals) -> u64) -> Option<String> {
    let mut best: Option<&CategoryTotals> = None;
    for row in rows {
        if value(row) == 0 {
            continue;
        }
        if best.is_none_or(|current| value(row) > value(current)) {
            best = Some(row);
        }
    }
    best.map(|row| row.category.clone())
}

pub fn build_predictive(
    events: &[Event],
    months_ahead: usize,
    forecaster: &dyn Forecaster,
) -> PredictiveSeries {
    let buckets = aggregate(events);
    let Some((start, end)) = buckets.month_span() else {
        return PredictiveSeries::default();
    };

    PredictiveSeries {
        months: month_range(start, end).map(|m| m.to_string()).collect(),
        forecast_months: months_after(end, months_ahead)
            .into_iter()
            .map(|m| m.to_string())
            .collect(),
        supply: category_series(&buckets, Measure::Donated, months_ahead, forecaster),
        demand: category_series(&buckets, Measure::Requested, months_ahead, forecaster),
    }
}

fn category_series(
    buckets: &Buckets,
    measure: Measure,
    months_ahead: usize,
    forecaster: &dyn Forecaster,
) -> Vec<CategorySeries> {
    let Some((start, end)) = buckets.month_span() else {
        return Vec::new();
    };

    buckets
        .categories()
        .into_iter()
        .filter_map(|category| {
            let history = build_series(buckets, &category, start, end, measure);
            if history.iter().all(|value| *value == 0) {
                return None;
            }
            let predicted = forecaster.forecast(&history, months_ahead);
            Some(CategorySeries {
                category,
                history,
                predicted,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use chrono::NaiveDate;

    struct RepeatLast;

    impl Forecaster for RepeatLast {
        fn forecast(&self, history: &[u64], months_ahead: usize) -> Vec<i64> {
            let last = history.last().copied().unwrap_or(0) as i64;
            vec![last; months_ahead]
        }
    }

    fn event(kind: EventKind, category: &str, year: i32, month: u32, amount: u64) -> Event {
        Event {
            kind,
            category: Some(category.to_string()),
            timestamp: NaiveDate::from_ymd_opt(year, month, 1),
            amount,
        }
    }

    fn scenario() -> Vec<Event> {
        vec![
            event(EventKind::Donation, "O+", 2025, 1, 5),
            event(EventKind::Request, "O+", 2025, 1, 1),
            event(EventKind::Request, "O+", 2025, 2, 1),
        ]
    }

    #[test]
    fn stats_total_each_category() {
        let stats = build_stats(&scenario());
        assert_eq!(
            stats.per_category,
            vec![CategoryTotals {
                category: "O+".into(),
                needed: 2,
                donated: 5,
            }]
        );
        assert_eq!(stats.most_needed.as_deref(), Some("O+"));
        assert_eq!(stats.most_donated.as_deref(), Some("O+"));
    }

    #[test]
    fn stats_leaders_break_ties_alphabetically() {
        let stats = build_stats(&[
            event(EventKind::Request, "B+", 2025, 1, 1),
            event(EventKind::Request, "A-", 2025, 1, 1),
            event(EventKind::Donation, "B+", 2025, 1, 3),
        ]);
        assert_eq!(stats.most_needed.as_deref(), Some("A-"));
        assert_eq!(stats.most_donated.as_deref(), Some("B+"));
    }

    #[test]
    fn stats_without_activity_have_no_leaders() {
        let stats = build_stats(&[event(EventKind::Donation, "AB-", 2025, 1, 0)]);
        assert_eq!(stats.per_category.len(), 1);
        assert_eq!(stats.most_needed, None);
        assert_eq!(stats.most_donated, None);
    }

    #[test]
    fn predictive_series_split_supply_and_demand() {
        let series = build_predictive(&scenario(), 2, &RepeatLast);
        assert_eq!(series.months, vec!["2025-01", "2025-02"]);
        assert_eq!(series.forecast_months, vec!["2025-03", "2025-04"]);

        assert_eq!(series.supply.len(), 1);
        assert_eq!(series.supply[0].history, vec![5, 0]);
        assert_eq!(series.supply[0].predicted, vec![0, 0]);

        assert_eq!(series.demand.len(), 1);
        assert_eq!(series.demand[0].history, vec![1, 1]);
        assert_eq!(series.demand[0].predicted, vec![1, 1]);
    }

    #[test]
    fn categories_with_no_activity_in_a_measure_are_omitted() {
        let series = build_predictive(
            &[
                event(EventKind::Donation, "A+", 2025, 1, 2),
                event(EventKind::Request, "B-", 2025, 3, 1),
            ],
            1,
            &RepeatLast,
        );
        let supply: Vec<&str> = series.supply.iter().map(|s| s.category.as_str()).collect();
        let demand: Vec<&str> = series.demand.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(supply, vec!["A+"]);
        assert_eq!(demand, vec!["B-"]);
        assert_eq!(series.supply[0].history, vec![2, 0, 0]);
        assert_eq!(series.demand[0].history, vec![0, 0, 1]);
    }

    #[test]
    fn predictive_series_empty_without_events() {
        let series = build_predictive(&[], 3, &RepeatLast);
        assert!(series.months.is_empty());
        assert!(series.forecast_months.is_empty());
        assert!(series.supply.is_empty());
        assert!(series.demand.is_empty());
    }
}
