//! Integration tests for the prediction orchestrator

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use crate::test_utils::{add_mood, orchestrator, record_with_wellbeing, today};
use harmonia::config::ModelConfig;
use harmonia::core::orchestrator::PredictionOrchestrator;
use harmonia::db::store::{InMemoryRecordStore, RecordStore};
use harmonia::models::prediction::StressLevel;
use harmonia::models::record::DailyRecord;
use harmonia::recommendations::selector::Recommender;
use harmonia::recommendations::RuleBasedRecommender;
use harmonia::services::catalog::PlaceholderExerciseCatalog;
use harmonia::stress::model::{StressModel, WeightedStressModel};

#[tokio::test]
async fn computes_and_persists_a_prediction() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let mut record = record_with_wellbeing("u1", today(), Some(8.0), Some(9000));
    add_mood(&mut record, 85);
    store.upsert(&record).await.unwrap();

    let outcome = orchestrator(store.clone())
        .compute_prediction("u1", today(), false)
        .await;

    assert_eq!(outcome.prediction.score, 28);
    assert_eq!(outcome.prediction.level, StressLevel::Low);
    assert!(outcome.warning.is_none());

    let persisted = store.find("u1", today()).await.unwrap().unwrap();
    assert_eq!(persisted.stress_prediction.unwrap().score, 28);
    assert_eq!(persisted.recommendations.len(), outcome.recommendations.len());
}

#[tokio::test]
async fn repeated_calls_within_window_are_idempotent() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    store
        .upsert(&record_with_wellbeing("u1", today(), Some(8.0), Some(9000)))
        .await
        .unwrap();
    let orchestrator = orchestrator(store);

    let first = orchestrator.compute_prediction("u1", today(), false).await;
    let second = orchestrator.compute_prediction("u1", today(), false).await;

    assert_eq!(
        first.prediction.generated_at,
        second.prediction.generated_at
    );
    assert_eq!(
        serde_json::to_string(&first.prediction).unwrap(),
        serde_json::to_string(&second.prediction).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.recommendations).unwrap(),
        serde_json::to_string(&second.recommendations).unwrap()
    );
}

#[tokio::test]
async fn stale_prediction_is_recomputed() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let orchestrator = orchestrator(store.clone());

    let first = orchestrator.compute_prediction("u1", today(), false).await;

    // Age the persisted prediction past the staleness window
    let mut record = store.find("u1", today()).await.unwrap().unwrap();
    let stale_timestamp = Utc::now() - Duration::hours(7);
    record.stress_prediction.as_mut().unwrap().generated_at = stale_timestamp;
    store.upsert(&record).await.unwrap();

    let second = orchestrator.compute_prediction("u1", today(), false).await;
    assert!(second.prediction.generated_at > stale_timestamp);
    assert!(second.prediction.generated_at > first.prediction.generated_at);
}

#[tokio::test]
async fn force_refresh_bypasses_the_cache() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let orchestrator = orchestrator(store);

    let first = orchestrator.compute_prediction("u1", today(), false).await;
    let second = orchestrator.compute_prediction("u1", today(), true).await;

    assert!(second.prediction.generated_at >= first.prediction.generated_at);
    assert_ne!(
        first.prediction.generated_at,
        second.prediction.generated_at
    );
}

struct FailingModel;

impl StressModel for FailingModel {
    fn predict(
        &self,
        _record: &DailyRecord,
        _history: &[DailyRecord],
    ) -> Result<harmonia::models::prediction::StressPrediction, Box<dyn std::error::Error + Send + Sync>>
    {
        Err("synthetic model failure".into())
    }
}

#[tokio::test]
async fn model_failure_degrades_to_default_with_warning() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let config = ModelConfig::default();
    let orchestrator = PredictionOrchestrator::new(
        store,
        Arc::new(FailingModel),
        Arc::new(RuleBasedRecommender::new(
            Arc::new(PlaceholderExerciseCatalog),
            config.clone(),
        )),
        config,
        None,
    );

    let outcome = orchestrator.compute_prediction("u1", today(), true).await;

    assert_eq!(outcome.prediction.score, 50);
    assert_eq!(outcome.prediction.level, StressLevel::Medium);
    assert_eq!(outcome.prediction.confidence, 0.3);
    assert!(!outcome.warning.unwrap().is_empty());
}

struct FailingRecommender;

#[async_trait]
impl Recommender for FailingRecommender {
    async fn select(
        &self,
        _prediction: &harmonia::models::prediction::StressPrediction,
        _history: &[DailyRecord],
    ) -> Result<Vec<harmonia::models::recommendation::Recommendation>, Box<dyn std::error::Error + Send + Sync>>
    {
        Err("synthetic selector failure".into())
    }
}

#[tokio::test]
async fn selector_failure_degrades_to_fallback_recommendation() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let config = ModelConfig::default();
    let orchestrator = PredictionOrchestrator::new(
        store,
        Arc::new(WeightedStressModel::new(config.clone())),
        Arc::new(FailingRecommender),
        config,
        None,
    );

    let outcome = orchestrator.compute_prediction("u1", today(), true).await;

    assert_eq!(outcome.recommendations.len(), 1);
    assert_eq!(outcome.recommendations[0].title, "Conscious breathing");
    assert!(outcome.warning.is_some());
    // The prediction itself is still the real one
    assert!(outcome.prediction.score <= 100);
}

struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn find(
        &self,
        _user_id: &str,
        _date: NaiveDate,
    ) -> Result<Option<DailyRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Err("store offline".into())
    }

    async fn upsert(
        &self,
        _record: &DailyRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("store offline".into())
    }

    async fn history(
        &self,
        _user_id: &str,
        _since: NaiveDate,
        _before: NaiveDate,
    ) -> Result<Vec<DailyRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Err("store offline".into())
    }

    async fn recent_user_ids(
        &self,
        _since: NaiveDate,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        Err("store offline".into())
    }
}

#[tokio::test]
async fn store_failure_still_returns_a_valid_outcome() {
    let outcome = orchestrator(Arc::new(BrokenStore))
        .compute_prediction("u1", today(), false)
        .await;

    assert_eq!(outcome.prediction.score, 50);
    assert_eq!(outcome.prediction.level, StressLevel::Medium);
    assert!(outcome.warning.is_some());
    assert_eq!(outcome.recommendations.len(), 1);
}

#[tokio::test]
async fn persistence_failure_does_not_lose_the_result() {
    // Store that reads fine but refuses writes
    struct ReadOnlyStore(InMemoryRecordStore);

    #[async_trait]
    impl RecordStore for ReadOnlyStore {
        async fn find(
            &self,
            user_id: &str,
            date: NaiveDate,
        ) -> Result<Option<DailyRecord>, Box<dyn std::error::Error + Send + Sync>> {
            self.0.find(user_id, date).await
        }

        async fn upsert(
            &self,
            _record: &DailyRecord,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("write conflict".into())
        }

        async fn history(
            &self,
            user_id: &str,
            since: NaiveDate,
            before: NaiveDate,
        ) -> Result<Vec<DailyRecord>, Box<dyn std::error::Error + Send + Sync>> {
            self.0.history(user_id, since, before).await
        }

        async fn recent_user_ids(
            &self,
            since: NaiveDate,
        ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            self.0.recent_user_ids(since).await
        }
    }

    let outcome = orchestrator(Arc::new(ReadOnlyStore(InMemoryRecordStore::new())))
        .compute_prediction("u1", today(), false)
        .await;

    // Computation succeeded even though nothing could be persisted
    assert_eq!(outcome.prediction.score, 57);
    assert_eq!(outcome.prediction.level, StressLevel::High);
    assert!(outcome.warning.is_none());
}

#[tokio::test]
async fn critical_days_append_alerts_up_to_the_cap() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let mut record = record_with_wellbeing("u1", today(), Some(3.0), Some(500));
    add_mood(&mut record, 5);
    store.upsert(&record).await.unwrap();

    let orchestrator = orchestrator(store.clone());
    for _ in 0..7 {
        let outcome = orchestrator.compute_prediction("u1", today(), true).await;
        assert_eq!(outcome.prediction.level, StressLevel::Critical);
    }

    let persisted = store.find("u1", today()).await.unwrap().unwrap();
    assert_eq!(persisted.alerts.len(), 5);
}

#[tokio::test]
async fn completion_survives_regeneration() {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let orchestrator = orchestrator(store.clone());

    let first = orchestrator.compute_prediction("u1", today(), true).await;
    assert!(!first.recommendations.is_empty());

    // Complete the first recommendation
    let mut record = store.find("u1", today()).await.unwrap().unwrap();
    record.recommendations[0].completed = true;
    record.recommendations[0].completed_at = Some(Utc::now());
    let completed_title = record.recommendations[0].title.clone();
    store.upsert(&record).await.unwrap();

    let second = orchestrator.compute_prediction("u1", today(), true).await;
    let carried = second
        .recommendations
        .iter()
        .find(|r| r.title == completed_title)
        .expect("recommendation regenerated");
    assert!(carried.completed);
}
