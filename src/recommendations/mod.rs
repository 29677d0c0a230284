//! Recommendation selection from a prediction and recent history.

pub mod selector;

pub use selector::{carry_completion, fallback_recommendation, Recommender, RuleBasedRecommender};
