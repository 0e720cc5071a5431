use bloodpulse::aggregate::{aggregate, Measure};
use bloodpulse::forecast::{Forecaster, TrainingConfig, WindowedRegressor};
use bloodpulse::models::{Event, EventKind};
use bloodpulse::series::build_series;
use chrono::NaiveDate;
use proptest::prelude::*;
use std::time::Duration;

const CATEGORIES: [&str; 5] = ["O+", "o-", " A+ ", "", "B+"];

fn arb_event() -> impl Strategy<Value = Event> {
    (
        any::<bool>(),
        proptest::option::of(0..CATEGORIES.len()),
        proptest::option::of((2023..2026i32, 1..=12u32, 1..=28u32)),
        0..1_000u64,
    )
        .prop_map(|(donation, category, date, amount)| Event {
            kind: if donation { EventKind::Donation } else { EventKind::Request },
            category: category.map(|i| CATEGORIES[i].to_string()),
            timestamp: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            amount,
        })
}

fn quick_model() -> WindowedRegressor {
    WindowedRegressor::new(TrainingConfig {
        epochs: 20,
        seed: Some(11),
        ..TrainingConfig::default()
    })
}

fn total(events: &[Event], kind: EventKind) -> u64 {
    events
        .iter()
        .filter(|e| e.kind == kind && e.timestamp.is_some())
        .map(|e| e.amount)
        .sum()
}

proptest! {
    #[test]
    fn prop_aggregation_conserves_amounts(events in proptest::collection::vec(arb_event(), 0..60)) {
        let buckets = aggregate(&events);
        let donated: u64 = buckets.iter().map(|(_, _, b)| b.donated).sum();
        let requested: u64 = buckets.iter().map(|(_, _, b)| b.requested).sum();

        prop_assert_eq!(donated, total(&events, EventKind::Donation));
        prop_assert_eq!(requested, total(&events, EventKind::Request));
    }

    #[test]
    fn prop_aggregation_ignores_order(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut reversed = events.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate(&events), aggregate(&reversed));
    }

    #[test]
    fn prop_series_span_whole_range(events in proptest::collection::vec(arb_event(), 1..60)) {
        let buckets = aggregate(&events);
        if let Some((start, end)) = buckets.month_span() {
            let expected = (start.months_until(end) + 1) as usize;
            for category in buckets.categories() {
                for measure in [Measure::Donated, Measure::Requested] {
                    let series = build_series(&buckets, &category, start, end, measure);
                    prop_assert_eq!(series.len(), expected);
                }
            }
        }
    }

    #[test]
    fn prop_forecast_length_matches_request(
        history in proptest::collection::vec(0..500u64, 0..12),
        months in 0..8usize,
    ) {
        let predicted = quick_model().forecast(&history, months);
        prop_assert_eq!(predicted.len(), months);
    }

    #[test]
    fn prop_single_point_history_repeats(value in 0..10_000u64, months in 0..8usize) {
        let predicted = quick_model().forecast(&[value], months);
        prop_assert_eq!(predicted, vec![value as i64; months]);
    }
}

#[test]
fn empty_history_forecasts_zeros_for_any_horizon() {
    let model = quick_model();
    for months in 0..5 {
        assert_eq!(model.forecast(&[], months), vec![0; months]);
    }
}

#[test]
fn end_to_end_scenario() {
    let events = vec![
        Event {
            kind: EventKind::Donation,
            category: Some("O+".into()),
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 12),
            amount: 5,
        },
        Event {
            kind: EventKind::Request,
            category: Some("O+".into()),
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 20),
            amount: 1,
        },
        Event {
            kind: EventKind::Request,
            category: Some("O+".into()),
            timestamp: NaiveDate::from_ymd_opt(2025, 2, 3),
            amount: 1,
        },
    ];

    let buckets = aggregate(&events);
    let totals = buckets.totals();
    assert_eq!(totals["O+"].donated, 5);
    assert_eq!(totals["O+"].requested, 2);

    let (start, end) = buckets.month_span().unwrap();
    let donated = build_series(&buckets, "O+", start, end, Measure::Donated);
    let requested = build_series(&buckets, "O+", start, end, Measure::Requested);
    assert_eq!(donated, vec![5, 0]);
    assert_eq!(requested, vec![1, 1]);

    let model = WindowedRegressor::new(TrainingConfig {
        seed: Some(3),
        budget: Duration::from_secs(5),
        ..TrainingConfig::default()
    });
    assert_eq!(model.forecast(&[0, 0, 0, 0], 3), vec![0, 0, 0]);

    let rising = model.forecast(&[10, 20, 30, 40, 50], 2);
    assert_eq!(rising.len(), 2);
    assert!(rising.iter().all(|v| *v > 50), "forecast {rising:?} did not trend upward");
    assert!(rising.iter().all(|v| *v <= 200));
}
