use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::prediction::{StressLevel, StressPrediction};
use crate::models::recommendation::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellbeingSource {
    Manual,
    GoogleFit,
    AppleHealth,
    Fitbit,
    Simulation,
}

impl Default for WellbeingSource {
    fn default() -> Self {
        WellbeingSource::Manual
    }
}

/// Normalized sleep/step snapshot for one day, as delivered by the
/// ingestion collaborator or manual entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellbeingSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default)]
    pub source: WellbeingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl WellbeingSnapshot {
    /// A zero value from a sync is treated the same as absent data.
    pub fn has_data(&self) -> bool {
        self.sleep_hours.map_or(false, |h| h > 0.0) || self.steps.map_or(false, |s| s > 0)
    }
}

/// Self-reported mood, 0-100, append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub exercise_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    StressAlert,
    PreventionAlert,
    ImprovementAlert,
}

/// User-facing alert appended by the alert policy. Never auto-deleted;
/// capped per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
    pub delivered_at: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
}

/// One document per (user, calendar day). Created lazily on the first
/// write for that day and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wellbeing: Option<WellbeingSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_prediction: Option<StressPrediction>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub sessions: Vec<ExerciseSession>,
    #[serde(default)]
    pub mood_entries: Vec<MoodEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyRecord {
    pub fn new(user_id: &str, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            date,
            wellbeing: None,
            stress_prediction: None,
            recommendations: Vec::new(),
            alerts: Vec::new(),
            sessions: Vec::new(),
            mood_entries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this day carries any wellbeing or mood signal at all.
    /// Routine-consistency scoring counts days by this.
    pub fn has_signal_data(&self) -> bool {
        self.wellbeing.as_ref().map_or(false, WellbeingSnapshot::has_data)
            || !self.mood_entries.is_empty()
    }
}
