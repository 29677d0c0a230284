//! Unit tests for the activity sub-scorer

use harmonia::scoring::activity;

#[test]
fn active_day_scores_low() {
    assert_eq!(activity::score(Some(8000)), 20);
    assert_eq!(activity::score(Some(15000)), 20);
}

#[test]
fn moderate_activity() {
    assert_eq!(activity::score(Some(5000)), 40);
    assert_eq!(activity::score(Some(7999)), 40);
}

#[test]
fn light_activity() {
    assert_eq!(activity::score(Some(3000)), 60);
    assert_eq!(activity::score(Some(4999)), 60);
}

#[test]
fn sedentary_day() {
    assert_eq!(activity::score(Some(2999)), 80);
    assert_eq!(activity::score(Some(1)), 80);
}

#[test]
fn missing_data_defaults() {
    assert_eq!(activity::score(None), activity::MISSING_ACTIVITY_SCORE);
    assert_eq!(activity::score(Some(0)), activity::MISSING_ACTIVITY_SCORE);
}
