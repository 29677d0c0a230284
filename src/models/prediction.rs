use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tier derived from the total stress score.
///
/// Tiers partition [0,100] exhaustively; boundaries are inclusive on the
/// lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl StressLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => StressLevel::Low,
            31..=50 => StressLevel::Medium,
            51..=70 => StressLevel::High,
            _ => StressLevel::Critical,
        }
    }

    /// High and critical tiers both count as elevated for persistence and
    /// prevention rules.
    pub fn is_elevated(self) -> bool {
        matches!(self, StressLevel::High | StressLevel::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Medium => "medium",
            StressLevel::High => "high",
            StressLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of factors a prediction can attribute stress to.
///
/// Five scored dimensions plus the recovery marker used by the default
/// prediction. Kept as an enum so factor handling stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Sleep,
    Activity,
    Mood,
    Consistency,
    Historical,
    SystemRecovery,
}

impl FactorKind {
    /// The five scored dimensions, in breakdown order.
    pub fn dimensions() -> [FactorKind; 5] {
        [
            FactorKind::Sleep,
            FactorKind::Activity,
            FactorKind::Mood,
            FactorKind::Consistency,
            FactorKind::Historical,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactorKind::Sleep => "sleep",
            FactorKind::Activity => "activity",
            FactorKind::Mood => "mood",
            FactorKind::Consistency => "consistency",
            FactorKind::Historical => "historical",
            FactorKind::SystemRecovery => "system_recovery",
        }
    }
}

impl std::fmt::Display for FactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dimension whose sub-score notably diverges from the total, surfaced
/// to the user as an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFactor {
    pub factor: FactorKind,
    pub impact: u8,
    pub description: String,
}

/// Per-dimension sub-scores that produced the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub sleep: u8,
    pub activity: u8,
    pub mood: u8,
    pub consistency: u8,
    pub historical: u8,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: FactorKind) -> Option<u8> {
        match dimension {
            FactorKind::Sleep => Some(self.sleep),
            FactorKind::Activity => Some(self.activity),
            FactorKind::Mood => Some(self.mood),
            FactorKind::Consistency => Some(self.consistency),
            FactorKind::Historical => Some(self.historical),
            FactorKind::SystemRecovery => None,
        }
    }

    pub fn neutral() -> Self {
        Self {
            sleep: 50,
            activity: 50,
            mood: 50,
            consistency: 50,
            historical: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressPrediction {
    pub score: u8,
    pub level: StressLevel,
    pub factors: Vec<KeyFactor>,
    pub confidence: f64,
    pub model_version: String,
    pub breakdown: ScoreBreakdown,
    pub generated_at: DateTime<Utc>,
}

impl StressPrediction {
    /// Age of this prediction relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.generated_at
    }
}
