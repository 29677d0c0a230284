//! Historical stress trend sub-score.

use crate::models::record::DailyRecord;

/// Neutral sub-score when no scored history exists.
pub const NEUTRAL_HISTORICAL_SCORE: u8 = 50;

const LOOKBACK_DAYS: usize = 5;

/// Average the most recent five persisted prediction scores, skipping
/// days that never got one. `history` is ordered most recent first.
pub fn score(history: &[DailyRecord]) -> u8 {
    if history.is_empty() {
        return NEUTRAL_HISTORICAL_SCORE;
    }

    let recent_scores: Vec<f64> = history
        .iter()
        .take(LOOKBACK_DAYS)
        .filter_map(|record| {
            record
                .stress_prediction
                .as_ref()
                .map(|prediction| f64::from(prediction.score))
        })
        .collect();

    if recent_scores.is_empty() {
        return NEUTRAL_HISTORICAL_SCORE;
    }

    let avg = recent_scores.iter().sum::<f64>() / recent_scores.len() as f64;
    avg.round() as u8
}
