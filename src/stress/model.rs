//! The weighted stress model and its always-valid fallback.

use chrono::Utc;
use tracing::debug;

use crate::config::ModelConfig;
use crate::models::prediction::{
    FactorKind, KeyFactor, ScoreBreakdown, StressLevel, StressPrediction,
};
use crate::models::record::DailyRecord;
use crate::scoring::{activity, consistency, historical, mood, sleep};
use crate::stress::aggregation::{self, SubScores};
use crate::stress::{confidence, factors};

/// Prediction seam for the orchestrator. The production model is total
/// over its inputs; a failing implementation exercises the orchestrator's
/// containment path.
pub trait StressModel: Send + Sync {
    fn predict(
        &self,
        record: &DailyRecord,
        history: &[DailyRecord],
    ) -> Result<StressPrediction, Box<dyn std::error::Error + Send + Sync>>;
}

/// Deterministic rule-based model over the five dimension scorers.
pub struct WeightedStressModel {
    config: ModelConfig,
}

impl WeightedStressModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

impl Default for WeightedStressModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl StressModel for WeightedStressModel {
    /// `history` is ordered most recent first.
    fn predict(
        &self,
        record: &DailyRecord,
        history: &[DailyRecord],
    ) -> Result<StressPrediction, Box<dyn std::error::Error + Send + Sync>> {
        let wellbeing = record.wellbeing.as_ref();

        let breakdown = ScoreBreakdown {
            sleep: sleep::score(wellbeing.and_then(|w| w.sleep_hours)),
            activity: activity::score(wellbeing.and_then(|w| w.steps)),
            mood: mood::score(&record.mood_entries),
            consistency: consistency::score(history),
            historical: historical::score(history),
        };

        debug!(
            user_id = %record.user_id,
            sleep = breakdown.sleep,
            activity = breakdown.activity,
            mood = breakdown.mood,
            consistency = breakdown.consistency,
            historical = breakdown.historical,
            "computed dimension sub-scores"
        );

        let scores = SubScores::complete(&breakdown);
        let score = aggregation::total_score(&scores, &self.config.weights);
        let level = StressLevel::from_score(score);

        Ok(StressPrediction {
            score,
            level,
            factors: factors::identify_key_factors(&scores, score, &self.config),
            confidence: confidence::calculate(record, history),
            model_version: self.config.model_version.clone(),
            breakdown,
            generated_at: Utc::now(),
        })
    }
}

/// The canned prediction substituted whenever normal computation fails:
/// neutral score, medium tier, floor confidence, a single recovery marker.
pub fn default_prediction(config: &ModelConfig) -> StressPrediction {
    StressPrediction {
        score: aggregation::DEFAULT_TOTAL,
        level: StressLevel::Medium,
        factors: vec![KeyFactor {
            factor: FactorKind::SystemRecovery,
            impact: 10,
            description: factors::describe(FactorKind::SystemRecovery, 50).to_string(),
        }],
        confidence: confidence::MIN_CONFIDENCE,
        model_version: config.model_version.clone(),
        breakdown: ScoreBreakdown::neutral(),
        generated_at: Utc::now(),
    }
}
