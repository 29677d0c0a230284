//! Aggregate statistics over persisted records for the analytics routes.

use serde::Serialize;

use crate::models::prediction::StressLevel;
use crate::models::record::DailyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressStats {
    pub average_stress: u8,
    pub trend: Trend,
    pub high_stress_days: usize,
    pub improvement_days: usize,
    pub total_days: usize,
}

/// Statistics over scored records, ordered most recent first.
pub fn stress_stats(records: &[DailyRecord]) -> StressStats {
    let scores: Vec<f64> = records
        .iter()
        .filter_map(|r| r.stress_prediction.as_ref().map(|p| f64::from(p.score)))
        .collect();

    if scores.is_empty() {
        return StressStats {
            average_stress: 0,
            trend: Trend::Stable,
            high_stress_days: 0,
            improvement_days: 0,
            total_days: 0,
        };
    }

    let average_stress =
        (scores.iter().sum::<f64>() / scores.len() as f64).round() as u8;

    // Most recent three scores against the three before them. Falling
    // stress counts as improvement.
    let recent: Vec<f64> = scores.iter().take(3).copied().collect();
    let previous: Vec<f64> = scores.iter().skip(3).take(3).copied().collect();
    let trend = if previous.is_empty() {
        Trend::Stable
    } else {
        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        let previous_avg = previous.iter().sum::<f64>() / previous.len() as f64;
        if recent_avg < previous_avg - 5.0 {
            Trend::Improving
        } else if recent_avg > previous_avg + 5.0 {
            Trend::Declining
        } else {
            Trend::Stable
        }
    };

    let high_stress_days = records
        .iter()
        .filter(|r| {
            r.stress_prediction
                .as_ref()
                .is_some_and(|p| p.level.is_elevated())
        })
        .count();

    let mut improvement_days = 0;
    for window in scores.iter().take(5).collect::<Vec<_>>().windows(2) {
        if window[0] < window[1] {
            improvement_days += 1;
        }
    }

    StressStats {
        average_stress,
        trend,
        high_stress_days,
        improvement_days,
        total_days: scores.len(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub total_days: usize,
    pub days_with_data: usize,
    pub average_stress: u8,
    pub average_sleep: f64,
    pub average_steps: u32,
    pub total_exercise_sessions: usize,
    pub total_mood_entries: usize,
    pub stress_trend: Trend,
    pub sleep_trend: Trend,
    pub activity_trend: Trend,
}

/// Weekly aggregates over records ordered oldest first.
pub fn weekly_summary(records: &[DailyRecord]) -> WeeklySummary {
    let stress: Vec<f64> = records
        .iter()
        .filter_map(|r| r.stress_prediction.as_ref().map(|p| f64::from(p.score)))
        .collect();
    let sleep: Vec<f64> = records
        .iter()
        .filter_map(|r| r.wellbeing.as_ref().and_then(|w| w.sleep_hours))
        .filter(|h| *h > 0.0)
        .collect();
    let steps: Vec<f64> = records
        .iter()
        .filter_map(|r| r.wellbeing.as_ref().and_then(|w| w.steps))
        .filter(|s| *s > 0)
        .map(f64::from)
        .collect();

    WeeklySummary {
        total_days: records.len(),
        days_with_data: records
            .iter()
            .filter(|r| {
                r.has_signal_data() || r.stress_prediction.is_some() || !r.sessions.is_empty()
            })
            .count(),
        average_stress: average(&stress).round() as u8,
        average_sleep: (average(&sleep) * 10.0).round() / 10.0,
        average_steps: average(&steps).round() as u32,
        total_exercise_sessions: records.iter().map(|r| r.sessions.len()).sum(),
        total_mood_entries: records.iter().map(|r| r.mood_entries.len()).sum(),
        stress_trend: half_trend(&stress, 5.0, true),
        sleep_trend: half_trend(&sleep, 0.5, false),
        activity_trend: half_trend(&steps, 1000.0, false),
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Compare the first half of the week against the second. For stress a
/// falling value is an improvement; for sleep and activity a rising one.
fn half_trend(values: &[f64], threshold: f64, lower_is_better: bool) -> Trend {
    if values.len() < 3 {
        return Trend::Stable;
    }

    let mid = values.len().div_ceil(2);
    let first = average(&values[..mid]);
    let second = average(&values[mid..]);
    if first == 0.0 || second == 0.0 {
        return Trend::Stable;
    }

    let difference = if lower_is_better {
        first - second
    } else {
        second - first
    };

    if difference > threshold {
        Trend::Improving
    } else if difference < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyInsights {
    pub total_days: usize,
    pub average_stress: u8,
    pub average_mood: u8,
    pub average_sleep: f64,
    pub average_steps: u32,
    pub exercise_frequency: f64,
    pub stress_trend: Trend,
    pub high_stress_days: usize,
}

/// Longer-window aggregates for the insights route, records ordered
/// oldest first.
pub fn insights(records: &[DailyRecord]) -> DailyInsights {
    let stress: Vec<f64> = records
        .iter()
        .filter_map(|r| r.stress_prediction.as_ref().map(|p| f64::from(p.score)))
        .collect();
    let moods: Vec<f64> = records
        .iter()
        .flat_map(|r| r.mood_entries.iter().map(|m| f64::from(m.mood_score)))
        .collect();
    let sleep: Vec<f64> = records
        .iter()
        .filter_map(|r| r.wellbeing.as_ref().and_then(|w| w.sleep_hours))
        .filter(|h| *h > 0.0)
        .collect();
    let steps: Vec<f64> = records
        .iter()
        .filter_map(|r| r.wellbeing.as_ref().and_then(|w| w.steps))
        .filter(|s| *s > 0)
        .map(f64::from)
        .collect();
    let total_sessions: usize = records.iter().map(|r| r.sessions.len()).sum();

    DailyInsights {
        total_days: records.len(),
        average_stress: average(&stress).round() as u8,
        average_mood: average(&moods).round() as u8,
        average_sleep: (average(&sleep) * 10.0).round() / 10.0,
        average_steps: average(&steps).round() as u32,
        exercise_frequency: if records.is_empty() {
            0.0
        } else {
            total_sessions as f64 / records.len() as f64
        },
        stress_trend: half_trend(&stress, 5.0, true),
        high_stress_days: records
            .iter()
            .filter(|r| {
                r.stress_prediction
                    .as_ref()
                    .is_some_and(|p| matches!(p.level, StressLevel::High | StressLevel::Critical))
            })
            .count(),
    }
}
