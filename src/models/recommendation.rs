use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Exercise,
    Breathing,
    Mindfulness,
    Lifestyle,
    Urgent,
}

impl RecommendationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationKind::Exercise => "exercise",
            RecommendationKind::Breathing => "breathing",
            RecommendationKind::Mindfulness => "mindfulness",
            RecommendationKind::Lifestyle => "lifestyle",
            RecommendationKind::Urgent => "urgent",
        }
    }
}

/// A suggested action tied to a prediction. Regenerated wholesale each
/// time a new prediction is computed; completion flags are carried over by
/// (kind, title) matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub priority: u8,
    #[serde(default)]
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationKind,
        title: &str,
        description: &str,
        priority: u8,
        duration_minutes: Option<u32>,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            exercise_id: None,
            duration_minutes,
            priority,
            completed: false,
            completed_at: None,
        }
    }

    /// Deduplication identity: two entries with the same kind and title are
    /// considered the same suggestion.
    pub fn dedup_key(&self) -> (RecommendationKind, &str) {
        (self.kind, self.title.as_str())
    }
}
