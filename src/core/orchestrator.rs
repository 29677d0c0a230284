//! Prediction orchestration: caching, degradation, persistence, alerts.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::alerts::AlertPolicy;
use crate::config::ModelConfig;
use crate::db::store::RecordStore;
use crate::metrics::Metrics;
use crate::models::prediction::StressPrediction;
use crate::models::recommendation::Recommendation;
use crate::recommendations::selector::{carry_completion, fallback_recommendation, Recommender};
use crate::stress::model::{default_prediction, StressModel};

const FALLBACK_WARNING: &str = "Using fallback prediction due to a temporary error";
const RECOMMENDATION_WARNING: &str = "Using fallback recommendations due to a temporary error";

/// What the caller always gets back: a valid prediction and
/// recommendation set, with a warning when any stage degraded.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub prediction: StressPrediction,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Per-request entry point for the scoring pipeline. The only component
/// with side effects; every sub-step has a total fallback, so the outcome
/// is total over all inputs.
pub struct PredictionOrchestrator {
    store: Arc<dyn RecordStore>,
    model: Arc<dyn StressModel>,
    recommender: Arc<dyn Recommender>,
    alerts: AlertPolicy,
    config: ModelConfig,
    metrics: Option<Arc<Metrics>>,
}

impl PredictionOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        model: Arc<dyn StressModel>,
        recommender: Arc<dyn Recommender>,
        config: ModelConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let alerts = AlertPolicy::new(store.clone(), config.clone(), metrics.clone());
        Self {
            store,
            model,
            recommender,
            alerts,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Produce the prediction for one (user, day).
    ///
    /// Without `force_refresh`, a persisted prediction younger than the
    /// staleness window is returned unchanged, together with its
    /// recommendations. This check is also the loop guard for
    /// write-triggered re-predictions.
    pub async fn compute_prediction(
        &self,
        user_id: &str,
        date: NaiveDate,
        force_refresh: bool,
    ) -> PredictionOutcome {
        let start = Instant::now();
        info!(user_id = %user_id, force_refresh, "starting stress prediction for user {}", user_id);

        let mut record = match self.store.find_or_create(user_id, date).await {
            Ok(record) => record,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "could not load daily record");
                if let Some(ref metrics) = self.metrics {
                    metrics.prediction_fallbacks_total.inc();
                }
                return PredictionOutcome {
                    prediction: default_prediction(&self.config),
                    recommendations: vec![fallback_recommendation()],
                    warning: Some(FALLBACK_WARNING.to_string()),
                };
            }
        };

        if !force_refresh {
            if let Some(ref cached) = record.stress_prediction {
                if cached.age(Utc::now()) < self.config.staleness() {
                    debug!(user_id = %user_id, "returning cached prediction");
                    if let Some(ref metrics) = self.metrics {
                        metrics.predictions_cached_total.inc();
                    }
                    return PredictionOutcome {
                        prediction: cached.clone(),
                        recommendations: record.recommendations.clone(),
                        warning: None,
                    };
                }
            }
        }

        let since = date - Duration::days(self.config.history_window_days);
        let history = match self.store.history(user_id, since, date).await {
            Ok(history) => history,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "history fetch failed, predicting without history");
                Vec::new()
            }
        };
        debug!(user_id = %user_id, count = history.len(), "loaded {} historical records", history.len());

        let mut warning = None;

        let prediction = match self.model.predict(&record, &history) {
            Ok(prediction) => prediction,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "prediction failed, using default");
                if let Some(ref metrics) = self.metrics {
                    metrics.prediction_fallbacks_total.inc();
                }
                warning = Some(FALLBACK_WARNING.to_string());
                default_prediction(&self.config)
            }
        };

        let mut recommendations = match self.recommender.select(&prediction, &history).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "recommendation selection failed, using fallback");
                warning.get_or_insert_with(|| RECOMMENDATION_WARNING.to_string());
                vec![fallback_recommendation()]
            }
        };
        carry_completion(&record.recommendations, &mut recommendations);

        info!(
            user_id = %user_id,
            score = prediction.score,
            level = %prediction.level,
            recommendations = recommendations.len(),
            "prediction generated: {} ({})",
            prediction.score,
            prediction.level
        );

        record.stress_prediction = Some(prediction.clone());
        record.recommendations = recommendations.clone();
        if let Err(e) = self.store.upsert(&record).await {
            // The computed result is still returned; only the cache misses out.
            warn!(user_id = %user_id, error = %e, "could not persist prediction");
        }

        self.alerts.evaluate(user_id, date, &prediction).await;

        if let Some(ref metrics) = self.metrics {
            metrics.predictions_total.inc();
            metrics
                .prediction_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        PredictionOutcome {
            prediction,
            recommendations,
            warning,
        }
    }
}
