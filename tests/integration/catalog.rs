//! Integration tests for catalog enrichment

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use harmonia::config::ModelConfig;
use harmonia::models::prediction::{ScoreBreakdown, StressLevel, StressPrediction};
use harmonia::models::recommendation::RecommendationKind;
use harmonia::recommendations::selector::Recommender;
use harmonia::recommendations::RuleBasedRecommender;
use harmonia::services::catalog::{CatalogCategory, ExerciseCatalog, HttpExerciseCatalog};

fn prediction(score: u8) -> StressPrediction {
    StressPrediction {
        score,
        level: StressLevel::from_score(score),
        factors: Vec::new(),
        confidence: 0.5,
        model_version: "1.2".to_string(),
        breakdown: ScoreBreakdown::neutral(),
        generated_at: Utc::now(),
    }
}

#[tokio::test]
async fn fetches_items_for_a_category() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exercises"))
        .and(query_param("category", "breathing"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "exercises": [
                {
                    "_id": "ex-478",
                    "title": "4-7-8 breathing",
                    "category": "breathing",
                    "duration_seconds": 300
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let catalog = HttpExerciseCatalog::new(mock_server.uri());
    let items = catalog
        .fetch_items(CatalogCategory::Breathing, 2)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "ex-478");
    assert_eq!(items[0].duration_seconds, 300);
}

#[tokio::test]
async fn server_errors_surface_as_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exercises"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let catalog = HttpExerciseCatalog::new(mock_server.uri());
    let result = catalog.fetch_items(CatalogCategory::Mindfulness, 2).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn enrichment_overrides_the_first_matching_recommendation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exercises"))
        .and(query_param("category", "breathing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "exercises": [
                {
                    "_id": "ex-box",
                    "title": "Box breathing",
                    "category": "breathing",
                    "duration_seconds": 290
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let selector = RuleBasedRecommender::new(
        Arc::new(HttpExerciseCatalog::new(mock_server.uri())),
        ModelConfig::default(),
    );

    // Medium tier maps to the breathing category
    let recommendations = selector.select(&prediction(40), &[]).await.unwrap();
    let enriched = recommendations
        .iter()
        .find(|r| r.kind == RecommendationKind::Breathing)
        .expect("breathing recommendation");

    assert_eq!(enriched.title, "Box breathing");
    assert_eq!(enriched.exercise_id.as_deref(), Some("ex-box"));
    assert_eq!(enriched.duration_minutes, Some(5)); // 290s rounds up
}

#[tokio::test]
async fn unreachable_catalog_keeps_recommendations_valid() {
    // Port with nothing listening: the enrichment call fails fast
    let selector = RuleBasedRecommender::new(
        Arc::new(HttpExerciseCatalog::new(
            "http://127.0.0.1:1".to_string(),
        )),
        ModelConfig::default(),
    );

    let recommendations = selector.select(&prediction(40), &[]).await.unwrap();

    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].title, "Breathing for balance");
    assert!(recommendations[0].exercise_id.is_none());
}
