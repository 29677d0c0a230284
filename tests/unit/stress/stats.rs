//! Unit tests for aggregate statistics

use crate::test_utils::{day, record, with_moods, with_prediction, with_wellbeing};
use harmonia::stress::stats::{insights, stress_stats, weekly_summary, Trend};

#[test]
fn empty_history_yields_empty_stats() {
    let stats = stress_stats(&[]);
    assert_eq!(stats.total_days, 0);
    assert_eq!(stats.average_stress, 0);
    assert_eq!(stats.trend, Trend::Stable);
}

#[test]
fn average_and_high_days() {
    let records = vec![
        with_prediction(record("u1", day(1)), 80),
        with_prediction(record("u1", day(2)), 60),
        with_prediction(record("u1", day(3)), 40),
    ];
    let stats = stress_stats(&records);
    assert_eq!(stats.average_stress, 60);
    assert_eq!(stats.high_stress_days, 2);
    assert_eq!(stats.total_days, 3);
}

#[test]
fn falling_scores_trend_improving() {
    // Most recent first: recent avg 30, previous avg 80
    let records: Vec<_> = [30, 30, 30, 80, 80, 80]
        .iter()
        .enumerate()
        .map(|(i, &score)| with_prediction(record("u1", day(i as i64 + 1)), score))
        .collect();
    assert_eq!(stress_stats(&records).trend, Trend::Improving);
}

#[test]
fn rising_scores_trend_declining() {
    let records: Vec<_> = [80, 80, 80, 30, 30, 30]
        .iter()
        .enumerate()
        .map(|(i, &score)| with_prediction(record("u1", day(i as i64 + 1)), score))
        .collect();
    assert_eq!(stress_stats(&records).trend, Trend::Declining);
}

#[test]
fn weekly_summary_aggregates() {
    // Oldest first
    let records = vec![
        with_prediction(
            with_wellbeing(record("u1", day(6)), Some(8.0), Some(10000)),
            40,
        ),
        with_prediction(
            with_wellbeing(record("u1", day(5)), Some(6.0), Some(4000)),
            60,
        ),
        with_moods(record("u1", day(4)), &[70, 80]),
    ];

    let summary = weekly_summary(&records);
    assert_eq!(summary.total_days, 3);
    assert_eq!(summary.days_with_data, 3);
    assert_eq!(summary.average_stress, 50);
    assert_eq!(summary.average_sleep, 7.0);
    assert_eq!(summary.average_steps, 7000);
    assert_eq!(summary.total_mood_entries, 2);
}

#[test]
fn insights_cover_the_window() {
    let records = vec![
        with_moods(
            with_prediction(with_wellbeing(record("u1", day(3)), Some(7.0), Some(8000)), 30),
            &[80],
        ),
        with_prediction(record("u1", day(2)), 70),
    ];

    let insights = insights(&records);
    assert_eq!(insights.total_days, 2);
    assert_eq!(insights.average_stress, 50);
    assert_eq!(insights.average_mood, 80);
    assert_eq!(insights.high_stress_days, 1);
}
