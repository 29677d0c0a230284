//! Unit tests for confidence calculation

use crate::test_utils::{day, empty_history, record, with_moods, with_wellbeing};
use harmonia::stress::confidence::{calculate, MAX_CONFIDENCE, MIN_CONFIDENCE};

#[test]
fn bare_record_has_base_confidence() {
    assert_eq!(calculate(&record("u1", day(0)), &[]), 0.5);
}

#[test]
fn each_signal_raises_confidence() {
    let with_sleep = with_wellbeing(record("u1", day(0)), Some(7.5), None);
    assert_eq!(calculate(&with_sleep, &[]), 0.7);

    let with_both = with_wellbeing(record("u1", day(0)), Some(7.5), Some(8000));
    assert_eq!(calculate(&with_both, &[]), 0.85);

    let with_mood = with_moods(record("u1", day(0)), &[70]);
    assert_eq!(calculate(&with_mood, &[]), 0.65);
}

#[test]
fn history_depth_raises_confidence() {
    let record = record("u1", day(0));
    assert_eq!(calculate(&record, &empty_history("u1", 3)), 0.6);
    assert_eq!(calculate(&record, &empty_history("u1", 7)), 0.7);
}

#[test]
fn confidence_is_clamped_to_ceiling() {
    let full = with_moods(
        with_wellbeing(record("u1", day(0)), Some(8.0), Some(9000)),
        &[80],
    );
    // 0.5 + 0.2 + 0.15 + 0.15 + 0.1 + 0.1 would be 1.2
    assert_eq!(calculate(&full, &empty_history("u1", 7)), MAX_CONFIDENCE);
}

#[test]
fn confidence_never_leaves_bounds() {
    let cases = [
        record("u1", day(0)),
        with_wellbeing(record("u1", day(0)), Some(7.0), Some(10000)),
        with_moods(record("u1", day(0)), &[10, 20, 30]),
    ];
    for case in cases {
        for history_len in [0usize, 1, 3, 7, 14] {
            let confidence = calculate(&case, &empty_history("u1", history_len));
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence));
        }
    }
}
