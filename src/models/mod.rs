//! Shared data models spanning the engine layers.

pub mod prediction;
pub mod record;
pub mod recommendation;

pub use prediction::{FactorKind, KeyFactor, ScoreBreakdown, StressLevel, StressPrediction};
pub use record::{
    Alert, AlertKind, DailyRecord, ExerciseSession, MoodEntry, WellbeingSnapshot, WellbeingSource,
};
pub use recommendation::{Recommendation, RecommendationKind};
