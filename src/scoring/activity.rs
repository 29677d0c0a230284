//! Physical activity sub-score from the daily step count.

/// Sub-score when step data is missing or zero.
pub const MISSING_ACTIVITY_SCORE: u8 = 60;

pub fn score(steps: Option<u32>) -> u8 {
    let steps = match steps {
        Some(s) if s > 0 => s,
        _ => return MISSING_ACTIVITY_SCORE,
    };

    if steps >= 8000 {
        20
    } else if steps >= 5000 {
        40
    } else if steps >= 3000 {
        60
    } else {
        80
    }
}
