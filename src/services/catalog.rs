//! Exercise catalog client for recommendation enrichment.
//!
//! The catalog is an external collaborator; every call here is
//! best-effort and bounded by a short client timeout.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const CATALOG_TIMEOUT: Duration = Duration::from_secs(3);

/// Catalog content category matched to a severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogCategory {
    Breathing,
    Mindfulness,
    Movement,
    Sound,
}

impl CatalogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogCategory::Breathing => "breathing",
            CatalogCategory::Mindfulness => "mindfulness",
            CatalogCategory::Movement => "movement",
            CatalogCategory::Sound => "sound",
        }
    }
}

impl std::fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub category: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Deserialize)]
struct ExercisesResponse {
    exercises: Vec<CatalogItem>,
}

#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Fetch up to `limit` active items for a category.
    async fn fetch_items(
        &self,
        category: CatalogCategory,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, Box<dyn std::error::Error + Send + Sync>>;
}

/// HTTP client against the exercises service.
pub struct HttpExerciseCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExerciseCatalog {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CATALOG_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }
}

#[async_trait]
impl ExerciseCatalog for HttpExerciseCatalog {
    async fn fetch_items(
        &self,
        category: CatalogCategory,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}/exercises", self.base_url);
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("category", category.as_str()), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: ExercisesResponse = response.json().await?;
        Ok(body.exercises)
    }
}

/// Catalog stub that never returns content. Recommendations stay valid
/// without enrichment, so this is a safe default when no catalog is
/// configured.
pub struct PlaceholderExerciseCatalog;

#[async_trait]
impl ExerciseCatalog for PlaceholderExerciseCatalog {
    async fn fetch_items(
        &self,
        _category: CatalogCategory,
        _limit: usize,
    ) -> Result<Vec<CatalogItem>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Vec::new())
    }
}
