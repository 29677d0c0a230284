//! Routine consistency sub-score.
//!
//! Measures how regularly the user has been logging anything at all over
//! the past week; gaps in the record raise the sub-score.

use crate::models::record::DailyRecord;

/// Neutral sub-score when there is not enough history to judge.
pub const NEUTRAL_CONSISTENCY_SCORE: u8 = 50;

const LOOKBACK_DAYS: usize = 7;
const MIN_HISTORY: usize = 3;

/// `history` is ordered most recent first.
pub fn score(history: &[DailyRecord]) -> u8 {
    if history.len() < MIN_HISTORY {
        return NEUTRAL_CONSISTENCY_SCORE;
    }

    let recent = &history[..history.len().min(LOOKBACK_DAYS)];
    let with_data = recent.iter().filter(|r| r.has_signal_data()).count();
    let completeness = with_data as f64 / recent.len() as f64;

    (100.0 - completeness * 100.0).round() as u8
}
