//! Rule-based recommendation selection.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::config::ModelConfig;
use crate::models::prediction::{FactorKind, StressLevel, StressPrediction};
use crate::models::record::DailyRecord;
use crate::models::recommendation::{Recommendation, RecommendationKind};
use crate::services::catalog::{CatalogCategory, ExerciseCatalog};

/// Selection seam for the orchestrator. The production selector is total;
/// a failing implementation exercises the fallback path.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// `history` is ordered most recent first.
    async fn select(
        &self,
        prediction: &StressPrediction,
        history: &[DailyRecord],
    ) -> Result<Vec<Recommendation>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Merges tier, factor and preventive rules, enriches from the exercise
/// catalog when reachable, then dedupes, sorts and caps.
pub struct RuleBasedRecommender {
    catalog: Arc<dyn ExerciseCatalog>,
    config: ModelConfig,
}

impl RuleBasedRecommender {
    pub fn new(catalog: Arc<dyn ExerciseCatalog>, config: ModelConfig) -> Self {
        Self { catalog, config }
    }

    fn level_recommendations(level: StressLevel) -> Vec<Recommendation> {
        match level {
            StressLevel::Low => vec![Recommendation::new(
                RecommendationKind::Mindfulness,
                "Keep your balance",
                "Continue your mindfulness practice to maintain your current wellbeing.",
                2,
                Some(10),
            )],
            StressLevel::Medium => vec![Recommendation::new(
                RecommendationKind::Breathing,
                "Breathing for balance",
                "Practice conscious breathing to manage moderate stress.",
                3,
                Some(5),
            )],
            StressLevel::High => vec![
                Recommendation::new(
                    RecommendationKind::Exercise,
                    "Urgent relaxation exercise",
                    "Do this exercise now to bring elevated stress levels down.",
                    4,
                    Some(15),
                ),
                Recommendation::new(
                    RecommendationKind::Lifestyle,
                    "Active rest",
                    "Consider taking short breaks every hour during your day.",
                    3,
                    None,
                ),
            ],
            StressLevel::Critical => vec![
                Recommendation::new(
                    RecommendationKind::Urgent,
                    "Immediate attention needed",
                    "Critical stress levels detected. Practice grounding techniques right away.",
                    5,
                    Some(20),
                ),
                Recommendation::new(
                    RecommendationKind::Breathing,
                    "Emergency breathing",
                    "4-7-8 technique to calm the nervous system quickly.",
                    5,
                    Some(5),
                ),
            ],
        }
    }

    fn factor_recommendations(prediction: &StressPrediction) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for key_factor in &prediction.factors {
            match key_factor.factor {
                FactorKind::Sleep => recommendations.push(Recommendation::new(
                    RecommendationKind::Lifestyle,
                    "Sleep hygiene",
                    "Improve your sleep routine with these recommended practices.",
                    3,
                    None,
                )),
                FactorKind::Activity => recommendations.push(Recommendation::new(
                    RecommendationKind::Exercise,
                    "Moderate physical activity",
                    "Add short walks through the day to raise your activity level.",
                    3,
                    Some(10),
                )),
                FactorKind::Mood => recommendations.push(Recommendation::new(
                    RecommendationKind::Mindfulness,
                    "Emotional regulation",
                    "Practice observing your emotions without judgment.",
                    4,
                    Some(8),
                )),
                FactorKind::Consistency
                | FactorKind::Historical
                | FactorKind::SystemRecovery => {}
            }
        }

        recommendations
    }

    fn preventive_recommendations(&self, history: &[DailyRecord]) -> Vec<Recommendation> {
        if history.len() < 3 {
            return Vec::new();
        }

        let elevated_days = history
            .iter()
            .take(5)
            .filter_map(|record| record.stress_prediction.as_ref())
            .filter(|prediction| prediction.level.is_elevated())
            .count();

        if elevated_days >= self.config.preventive_min_elevated {
            vec![Recommendation::new(
                RecommendationKind::Lifestyle,
                "Stress pattern detected",
                "You have had several high-stress days. Consider adjusting your weekly routine.",
                4,
                None,
            )]
        } else {
            Vec::new()
        }
    }

    /// Attach one catalog item to the first exercise/breathing entry,
    /// overriding its title and duration. Catalog failures never surface.
    async fn enrich_from_catalog(&self, level: StressLevel, recommendations: &mut [Recommendation]) {
        let category = match level {
            StressLevel::Low => CatalogCategory::Mindfulness,
            StressLevel::Medium => CatalogCategory::Breathing,
            StressLevel::High => CatalogCategory::Movement,
            StressLevel::Critical => CatalogCategory::Breathing,
        };

        let items = match self.catalog.fetch_items(category, 2).await {
            Ok(items) => items,
            Err(e) => {
                debug!(category = %category, error = %e, "catalog enrichment skipped");
                return;
            }
        };

        let Some(item) = items.first() else { return };
        let Some(target) = recommendations.iter_mut().find(|r| {
            matches!(
                r.kind,
                RecommendationKind::Exercise | RecommendationKind::Breathing
            )
        }) else {
            return;
        };

        target.exercise_id = Some(item.id.clone());
        target.title = item.title.clone();
        target.duration_minutes = Some(item.duration_seconds.div_ceil(60));
    }

    fn dedup_and_sort(&self, recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        let mut seen = HashSet::new();
        let mut unique: Vec<Recommendation> = recommendations
            .into_iter()
            .filter(|r| seen.insert((r.kind, r.title.clone())))
            .collect();

        unique.sort_by(|a, b| b.priority.cmp(&a.priority));
        unique.truncate(self.config.max_recommendations);
        unique
    }
}

#[async_trait]
impl Recommender for RuleBasedRecommender {
    async fn select(
        &self,
        prediction: &StressPrediction,
        history: &[DailyRecord],
    ) -> Result<Vec<Recommendation>, Box<dyn std::error::Error + Send + Sync>> {
        let mut recommendations = Self::level_recommendations(prediction.level);
        self.enrich_from_catalog(prediction.level, &mut recommendations)
            .await;

        recommendations.extend(Self::factor_recommendations(prediction));
        recommendations.extend(self.preventive_recommendations(history));

        Ok(self.dedup_and_sort(recommendations))
    }
}

/// The single generic suggestion substituted when selection fails.
pub fn fallback_recommendation() -> Recommendation {
    Recommendation::new(
        RecommendationKind::Breathing,
        "Conscious breathing",
        "Take 5 minutes to focus on your breath.",
        3,
        Some(5),
    )
}

/// Carry completion state from the previous generation onto matching
/// (kind, title) entries of the new one.
pub fn carry_completion(previous: &[Recommendation], next: &mut [Recommendation]) {
    for recommendation in next.iter_mut() {
        if let Some(prior) = previous
            .iter()
            .find(|p| p.dedup_key() == recommendation.dedup_key() && p.completed)
        {
            recommendation.completed = true;
            recommendation.completed_at = prior.completed_at;
        }
    }
}
