//! Weighted aggregation of dimension sub-scores into a total.

use crate::config::FactorWeights;
use crate::models::prediction::{FactorKind, ScoreBreakdown};

/// Total when no dimension produced a usable sub-score.
pub const DEFAULT_TOTAL: u8 = 50;

/// Sub-scores as actually available for aggregation.
///
/// The production path always fills all five (the scorers are total
/// functions), but aggregation renormalizes over present dimensions so the
/// contract holds for any subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubScores {
    pub sleep: Option<u8>,
    pub activity: Option<u8>,
    pub mood: Option<u8>,
    pub consistency: Option<u8>,
    pub historical: Option<u8>,
}

impl SubScores {
    pub fn complete(breakdown: &ScoreBreakdown) -> Self {
        Self {
            sleep: Some(breakdown.sleep),
            activity: Some(breakdown.activity),
            mood: Some(breakdown.mood),
            consistency: Some(breakdown.consistency),
            historical: Some(breakdown.historical),
        }
    }

    pub fn get(&self, dimension: FactorKind) -> Option<u8> {
        match dimension {
            FactorKind::Sleep => self.sleep,
            FactorKind::Activity => self.activity,
            FactorKind::Mood => self.mood,
            FactorKind::Consistency => self.consistency,
            FactorKind::Historical => self.historical,
            FactorKind::SystemRecovery => None,
        }
    }

    pub fn entries(&self) -> [(FactorKind, Option<u8>); 5] {
        [
            (FactorKind::Sleep, self.sleep),
            (FactorKind::Activity, self.activity),
            (FactorKind::Mood, self.mood),
            (FactorKind::Consistency, self.consistency),
            (FactorKind::Historical, self.historical),
        ]
    }
}

/// Weighted average over the dimensions that are present, renormalizing
/// the weight mass over them. Clamped to [0,100].
pub fn total_score(scores: &SubScores, weights: &FactorWeights) -> u8 {
    let mut total = 0.0;
    let mut weight_mass = 0.0;

    for (dimension, sub_score) in scores.entries() {
        if let Some(value) = sub_score {
            let weight = weights.get(dimension);
            total += f64::from(value) * weight;
            weight_mass += weight;
        }
    }

    if weight_mass == 0.0 {
        return DEFAULT_TOTAL;
    }

    (total / weight_mass).round().clamp(0.0, 100.0) as u8
}
