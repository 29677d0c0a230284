//! Unit tests for the model configuration

use harmonia::config::{FactorWeights, ModelConfig};
use harmonia::models::prediction::FactorKind;

#[test]
fn default_weights_sum_to_one() {
    assert!(FactorWeights::default().verify());
}

#[test]
fn every_dimension_has_a_weight() {
    let weights = FactorWeights::default();
    for dimension in FactorKind::dimensions() {
        assert!(weights.get(dimension) > 0.0);
    }
    assert_eq!(weights.get(FactorKind::SystemRecovery), 0.0);
}

#[test]
fn default_config_windows() {
    let config = ModelConfig::default();
    assert_eq!(config.staleness(), chrono::Duration::hours(6));
    assert_eq!(config.trigger_cooldown(), chrono::Duration::minutes(30));
    assert_eq!(config.history_window_days, 14);
    assert_eq!(config.max_recommendations, 5);
    assert_eq!(config.max_alerts_per_record, 5);
    assert_eq!(config.model_version, "1.2");
}
