//! Mood sub-score from the day's self-reported entries.
//!
//! Polarity inverts here: a high reported mood yields a low stress
//! sub-score.

use crate::models::record::MoodEntry;

/// Neutral sub-score when no mood has been reported yet.
pub const NEUTRAL_MOOD_SCORE: u8 = 50;

/// Average the most recent three entries and map onto the stress scale.
/// Entry scores are validated to 0-100 at ingestion.
pub fn score(entries: &[MoodEntry]) -> u8 {
    if entries.is_empty() {
        return NEUTRAL_MOOD_SCORE;
    }

    let recent: Vec<f64> = entries
        .iter()
        .rev()
        .take(3)
        .map(|entry| f64::from(entry.mood_score))
        .collect();

    if recent.is_empty() {
        return NEUTRAL_MOOD_SCORE;
    }

    let avg = recent.iter().sum::<f64>() / recent.len() as f64;

    if avg >= 80.0 {
        20
    } else if avg >= 60.0 {
        40
    } else if avg >= 40.0 {
        60
    } else if avg >= 20.0 {
        80
    } else {
        90
    }
}
