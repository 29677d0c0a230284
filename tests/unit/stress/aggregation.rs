//! Unit tests for sub-score aggregation

use harmonia::config::FactorWeights;
use harmonia::models::prediction::{ScoreBreakdown, StressLevel};
use harmonia::stress::aggregation::{total_score, SubScores, DEFAULT_TOTAL};

fn weights() -> FactorWeights {
    FactorWeights::default()
}

#[test]
fn weighted_total_for_a_good_day() {
    // sleep 20, activity 20, mood 20, consistency 50, historical 50
    let scores = SubScores::complete(&ScoreBreakdown {
        sleep: 20,
        activity: 20,
        mood: 20,
        consistency: 50,
        historical: 50,
    });
    // 20*.25 + 20*.20 + 20*.30 + 50*.15 + 50*.10 = 27.5 -> 28
    assert_eq!(total_score(&scores, &weights()), 28);
    assert_eq!(StressLevel::from_score(28), StressLevel::Low);
}

#[test]
fn weighted_total_with_all_defaults() {
    let scores = SubScores::complete(&ScoreBreakdown {
        sleep: 70,
        activity: 60,
        mood: 50,
        consistency: 50,
        historical: 50,
    });
    // 70*.25 + 60*.20 + 50*.30 + 50*.15 + 50*.10 = 57
    assert_eq!(total_score(&scores, &weights()), 57);
    assert_eq!(StressLevel::from_score(57), StressLevel::High);
}

#[test]
fn missing_dimensions_renormalize() {
    let scores = SubScores {
        sleep: Some(80),
        activity: None,
        mood: Some(80),
        consistency: None,
        historical: None,
    };
    // Only sleep and mood present: (80*.25 + 80*.30) / .55 = 80
    assert_eq!(total_score(&scores, &weights()), 80);
}

#[test]
fn all_absent_falls_back_to_neutral() {
    let scores = SubScores::default();
    assert_eq!(total_score(&scores, &weights()), DEFAULT_TOTAL);
    assert_eq!(
        StressLevel::from_score(DEFAULT_TOTAL),
        StressLevel::Medium
    );
}

#[test]
fn total_is_always_bounded() {
    for value in [0u8, 25, 50, 75, 100] {
        let scores = SubScores::complete(&ScoreBreakdown {
            sleep: value,
            activity: value,
            mood: value,
            consistency: value,
            historical: value,
        });
        let total = total_score(&scores, &weights());
        assert!(total <= 100);
        assert_eq!(total, value);
    }
}

#[test]
fn tier_partition_is_exhaustive() {
    for score in 0..=100u8 {
        let level = StressLevel::from_score(score);
        match score {
            0..=30 => assert_eq!(level, StressLevel::Low),
            31..=50 => assert_eq!(level, StressLevel::Medium),
            51..=70 => assert_eq!(level, StressLevel::High),
            _ => assert_eq!(level, StressLevel::Critical),
        }
    }
}
