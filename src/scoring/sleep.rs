//! Sleep duration sub-score.

/// Sub-score when sleep data is missing. No data on sleep is itself
/// treated as concerning.
pub const MISSING_SLEEP_SCORE: u8 = 70;

/// Score last night's sleep. Zero and non-finite values count as missing.
pub fn score(sleep_hours: Option<f64>) -> u8 {
    let hours = match sleep_hours {
        Some(h) if h > 0.0 && h.is_finite() => h,
        _ => return MISSING_SLEEP_SCORE,
    };

    if (7.0..=9.0).contains(&hours) {
        20 // optimal
    } else if (6.0..7.0).contains(&hours) {
        40
    } else if hours > 9.0 {
        50 // oversleeping
    } else if (5.0..6.0).contains(&hours) {
        60
    } else {
        80 // severely short
    }
}
