//! Unit tests for the weighted stress model

use crate::test_utils::{day, record, with_moods, with_prediction, with_wellbeing};
use harmonia::config::ModelConfig;
use harmonia::models::prediction::{FactorKind, StressLevel};
use harmonia::stress::model::{default_prediction, StressModel, WeightedStressModel};

#[test]
fn good_day_scores_low() {
    let model = WeightedStressModel::default();
    let today = with_moods(
        with_wellbeing(record("u1", day(0)), Some(8.0), Some(9000)),
        &[85],
    );

    let prediction = model.predict(&today, &[]).unwrap();

    assert_eq!(prediction.breakdown.sleep, 20);
    assert_eq!(prediction.breakdown.activity, 20);
    assert_eq!(prediction.breakdown.mood, 20);
    assert_eq!(prediction.breakdown.consistency, 50);
    assert_eq!(prediction.breakdown.historical, 50);
    assert_eq!(prediction.score, 28);
    assert_eq!(prediction.level, StressLevel::Low);
}

#[test]
fn empty_day_scores_high() {
    let model = WeightedStressModel::default();
    let prediction = model.predict(&record("u1", day(0)), &[]).unwrap();

    assert_eq!(prediction.breakdown.sleep, 70);
    assert_eq!(prediction.breakdown.activity, 60);
    assert_eq!(prediction.breakdown.mood, 50);
    assert_eq!(prediction.score, 57);
    assert_eq!(prediction.level, StressLevel::High);
    assert_eq!(prediction.confidence, 0.5);
}

#[test]
fn bad_day_with_bad_history_goes_critical() {
    let model = WeightedStressModel::default();
    let today = with_moods(
        with_wellbeing(record("u1", day(0)), Some(3.0), Some(1000)),
        &[10],
    );
    let history: Vec<_> = (1..=5)
        .map(|n| with_prediction(record("u1", day(n)), 85))
        .collect();

    let prediction = model.predict(&today, &history).unwrap();

    assert_eq!(prediction.breakdown.sleep, 80);
    assert_eq!(prediction.breakdown.activity, 80);
    assert_eq!(prediction.breakdown.mood, 90);
    assert_eq!(prediction.level, StressLevel::Critical);
}

#[test]
fn prediction_is_always_schema_valid() {
    let model = WeightedStressModel::default();
    let cases = [
        record("u1", day(0)),
        with_wellbeing(record("u1", day(0)), Some(0.0), Some(0)),
        with_moods(record("u1", day(0)), &[0, 100]),
    ];

    for case in cases {
        let prediction = model.predict(&case, &[]).unwrap();
        assert!(prediction.score <= 100);
        assert!((0.30..=0.95).contains(&prediction.confidence));
        assert!(!prediction.factors.is_empty());
        assert!(prediction.factors.len() <= 3);
        assert_eq!(prediction.model_version, "1.2");
    }
}

#[test]
fn factors_come_from_the_breakdown() {
    let model = WeightedStressModel::default();
    let today = with_wellbeing(record("u1", day(0)), Some(3.0), Some(12000));
    let prediction = model.predict(&today, &[]).unwrap();

    for factor in &prediction.factors {
        assert!(prediction.breakdown.get(factor.factor).is_some());
    }
}

#[test]
fn default_prediction_shape() {
    let fallback = default_prediction(&ModelConfig::default());

    assert_eq!(fallback.score, 50);
    assert_eq!(fallback.level, StressLevel::Medium);
    assert_eq!(fallback.confidence, 0.3);
    assert_eq!(fallback.factors.len(), 1);
    assert_eq!(fallback.factors[0].factor, FactorKind::SystemRecovery);
    assert_eq!(fallback.breakdown.sleep, 50);
    assert_eq!(fallback.breakdown.historical, 50);
}
