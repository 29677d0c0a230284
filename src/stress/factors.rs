//! Key-factor selection and the canned factor descriptions.

use crate::config::ModelConfig;
use crate::models::prediction::{FactorKind, KeyFactor};
use crate::stress::aggregation::SubScores;

/// Pick up to three dimensions whose sub-score notably diverges from the
/// total. Falls back to the single highest-scoring dimension so every
/// prediction carries at least one explanation.
pub fn identify_key_factors(scores: &SubScores, total: u8, config: &ModelConfig) -> Vec<KeyFactor> {
    let mut factors = Vec::new();

    for (dimension, sub_score) in scores.entries() {
        let Some(value) = sub_score else { continue };
        let difference = i16::from(value) - i16::from(total);
        if difference.unsigned_abs() as u8 > config.factor_impact_threshold {
            factors.push(KeyFactor {
                factor: dimension,
                impact: (difference.unsigned_abs() as u8).min(config.factor_impact_cap),
                description: describe(dimension, value).to_string(),
            });
        }
    }

    if factors.is_empty() {
        let main = main_factor(scores);
        factors.push(KeyFactor {
            factor: main,
            impact: 15,
            description: describe(main, scores.get(main).unwrap_or(50)).to_string(),
        });
    }

    factors.sort_by(|a, b| b.impact.cmp(&a.impact));
    factors.truncate(config.max_key_factors);
    factors
}

/// The dimension with the highest raw sub-score; mood when nothing is
/// present at all.
fn main_factor(scores: &SubScores) -> FactorKind {
    let mut main = FactorKind::Mood;
    let mut highest = 0u8;

    for (dimension, sub_score) in scores.entries() {
        if let Some(value) = sub_score {
            if value > highest {
                highest = value;
                main = dimension;
            }
        }
    }

    main
}

/// Fixed human-readable phrase per (factor, severity bucket). Buckets
/// match the tier partition of the total score.
pub fn describe(factor: FactorKind, sub_score: u8) -> &'static str {
    match factor {
        FactorKind::Sleep => match sub_score {
            0..=30 => "Healthy sleep pattern",
            31..=50 => "Slightly affected sleep",
            51..=70 => "Moderate sleep problems",
            _ => "Severe sleep disruption",
        },
        FactorKind::Activity => match sub_score {
            0..=30 => "Optimal activity level",
            31..=50 => "Regular physical activity",
            51..=70 => "Insufficient physical activity",
            _ => "Significantly sedentary",
        },
        FactorKind::Mood => match sub_score {
            0..=30 => "Positive mood",
            31..=50 => "Stable mood",
            51..=70 => "Affected mood",
            _ => "Severely affected mood",
        },
        FactorKind::Consistency => match sub_score {
            0..=30 => "Very consistent routines",
            31..=50 => "Moderately consistent routines",
            51..=70 => "Irregular routines",
            _ => "No established routines",
        },
        FactorKind::Historical => match sub_score {
            0..=30 => "History of low stress",
            31..=50 => "History of moderate stress",
            51..=70 => "History of high stress",
            _ => "History of critical stress",
        },
        FactorKind::SystemRecovery => "System recovering, basic analysis in use",
    }
}
